//! Stdin/stdout terminal for interactive sessions

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vaultkeeper_core::dialogue::{Input, Terminal};

/// Line terminal over the process stdio.
///
/// The first Ctrl-C marks the session as interrupted, and the pending read
/// reports [`Input::Interrupted`] once it returns. A second Ctrl-C exits.
pub struct StdioTerminal {
    interrupted: Arc<AtomicBool>,
}

impl StdioTerminal {
    pub fn new() -> Self {
        let interrupted = Arc::new(AtomicBool::new(false));
        let interrupted_clone = Arc::clone(&interrupted);

        let _ = ctrlc::set_handler(move || {
            if interrupted_clone.swap(true, Ordering::SeqCst) {
                std::process::exit(130);
            }
            eprintln!("\n(interrupted, press Enter to finish or Ctrl-C again to quit)");
        });

        StdioTerminal { interrupted }
    }

    /// Ask a yes/no question; blank input takes the default
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            match self.read_line(&format!("{} {} ", question, hint))? {
                Input::Line(answer) => match answer.trim().to_lowercase().as_str() {
                    "" => return Ok(default),
                    "y" | "yes" => return Ok(true),
                    "n" | "no" => return Ok(false),
                    _ => self.status("Please answer y or n.")?,
                },
                Input::Eof | Input::Interrupted => return Ok(false),
            }
        }
    }
}

impl Terminal for StdioTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Ok(Input::Interrupted);
        }

        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line);

        if self.interrupted.load(Ordering::SeqCst) {
            println!();
            return Ok(Input::Interrupted);
        }
        match read {
            Ok(0) => {
                println!();
                Ok(Input::Eof)
            }
            Ok(_) => Ok(Input::Line(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Input::Interrupted),
            Err(e) => Err(e),
        }
    }

    fn say(&mut self, speaker: &str, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout)?;
        writeln!(stdout, "{}: {}", speaker, text)?;
        writeln!(stdout)
    }

    fn status(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)
    }
}
