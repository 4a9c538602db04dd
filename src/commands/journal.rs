//! `journal` command: guided reflection saved as a dated note

use chrono::Local;
use tracing::debug;
use vaultkeeper_core::dialogue::{has_user_input, run_conversation, Input, Terminal};
use vaultkeeper_core::error::Result;
use vaultkeeper_core::journal::{self, synthesize_note};
use vaultkeeper_core::note::{Note, ReflectionType};

use super::terminal::StdioTerminal;
use super::{build_oracle, open_vault, CommandContext};

pub fn execute(ctx: &CommandContext, reflection_type: Option<ReflectionType>) -> Result<()> {
    let config = ctx.load_config()?;
    let oracle = build_oracle(&config)?;
    let vault = open_vault(&config)?;
    let mut terminal = StdioTerminal::new();

    let reflection_type = match reflection_type {
        Some(t) => t,
        None => match pick_reflection_type(&mut terminal)? {
            Some(t) => t,
            None => return Ok(()),
        },
    };

    if let Some(last) = vault
        .list_journal_notes(&vault.layout().journal_folder, 1)
        .first()
    {
        terminal.status(&format!("\nLast entry: {}", last.title))?;
    }
    terminal.status(&format!("\nStarting {} reflection...", reflection_type))?;
    let transcript = run_conversation(
        &oracle,
        &mut terminal,
        &journal::script(reflection_type),
        config.max_rounds,
    )?;
    if !has_user_input(&transcript) {
        terminal.status("No input captured. Exiting.")?;
        return Ok(());
    }

    terminal.status("\nSynthesizing your reflection...\n")?;
    let titles = vault.get_all_note_titles();
    let note = synthesize_note(
        &oracle,
        &transcript,
        reflection_type,
        &titles,
        Local::now().date_naive(),
        &vault.layout().journal_folder,
    )?;
    debug!(elapsed = ?ctx.start.elapsed(), title = %note.title, "synthesize");

    print_note(&note);

    if terminal.confirm("Save this note to your vault?", true)? {
        let path = vault.write_note(&note)?;
        println!("\nSaved: {}", path.display());
    } else {
        println!("Note discarded.");
    }
    Ok(())
}

/// Numbered menu; accepts a number or a type name. `None` on EOF or interrupt.
fn pick_reflection_type(terminal: &mut StdioTerminal) -> Result<Option<ReflectionType>> {
    terminal.status("\nChoose a reflection type:\n")?;
    for (i, t) in ReflectionType::ALL.iter().enumerate() {
        terminal.status(&format!("  {}. {}", i + 1, t))?;
    }
    terminal.status("")?;

    loop {
        let answer = match terminal.read_line("Selection: ")? {
            Input::Line(line) => line,
            Input::Eof | Input::Interrupted => return Ok(None),
        };
        if let Some(t) = parse_selection(&answer) {
            return Ok(Some(t));
        }
        terminal.status(&format!(
            "Enter a number from 1 to {} or a type name.",
            ReflectionType::ALL.len()
        ))?;
    }
}

fn parse_selection(answer: &str) -> Option<ReflectionType> {
    let answer = answer.trim();
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 => ReflectionType::ALL.get(n - 1).copied(),
        Ok(_) => None,
        Err(_) => answer.parse().ok(),
    }
}

fn print_note(note: &Note) {
    println!("Title: {}", note.title);
    println!("Folder: {}/", note.folder);
    println!("Tags: {}", note.frontmatter.tags.join(", "));
    if !note.frontmatter.related.is_empty() {
        println!("Related: {}", note.frontmatter.related.join(", "));
    }
    println!();
    println!("{}", note.body);
    println!();
}
