//! `plan` command: plan the day and write it into the daily note

use chrono::Local;
use tracing::debug;
use vaultkeeper_core::dialogue::{has_user_input, run_conversation, Terminal};
use vaultkeeper_core::error::Result;
use vaultkeeper_core::plan::{self, synthesize_plan};
use vaultkeeper_core::weather::fetch_weather;

use super::terminal::StdioTerminal;
use super::{build_oracle, open_vault, CommandContext};

pub fn execute(ctx: &CommandContext, yes: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let oracle = build_oracle(&config)?;
    let vault = open_vault(&config)?;
    let mut terminal = StdioTerminal::new();

    let today = Local::now().date_naive();
    let date = today.format("%Y-%m-%d").to_string();

    let weather = config
        .location()
        .and_then(|(latitude, longitude)| fetch_weather(latitude, longitude));
    match &weather {
        Some(w) => terminal.status(&format!("Weather: {}", w.summary))?,
        None if config.location().is_some() => {
            terminal.status("Weather unavailable, planning without it.")?
        }
        None => {}
    }
    debug!(elapsed = ?ctx.start.elapsed(), weather = weather.is_some(), "weather");

    let existing = vault.read_daily_note(&date).map(|note| note.body);
    if existing.as_deref().is_some_and(|body| !body.trim().is_empty()) {
        terminal.status("Found today's daily note; its content will inform the plan.")?;
    }

    let script = plan::script(weather.as_ref(), existing.as_deref());
    let transcript = run_conversation(&oracle, &mut terminal, &script, config.max_rounds)?;
    if !has_user_input(&transcript) {
        terminal.status("No input captured. Exiting.")?;
        return Ok(());
    }

    terminal.status("\nSynthesizing your plan...\n")?;
    let plan_markdown = synthesize_plan(&oracle, &transcript, weather.as_ref(), today)?;
    debug!(elapsed = ?ctx.start.elapsed(), "synthesize");

    println!("{}", plan_markdown);
    println!();

    let target = vault.daily_note_path(&date);
    let save = yes
        || terminal.confirm(
            &format!("Write this plan to {}?", target.display()),
            true,
        )?;
    if save {
        let path = vault.write_daily_plan(&date, &plan_markdown)?;
        println!("\nSaved: {}", path.display());
    } else {
        println!("Plan discarded.");
    }
    Ok(())
}
