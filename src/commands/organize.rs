//! `organize` subcommands: preview vault fixes and optionally apply them

use std::io::{self, Write};
use std::time::Instant;

use vaultkeeper_core::error::{Result, VaultError};
use vaultkeeper_core::reconcile::{
    preview, ApplyReport, FrontmatterReconciler, LinkReconciler, Reconciler, StructureReconciler,
};
use vaultkeeper_core::{trace_time, OutputFormat};

use super::{build_oracle, open_vault, CommandContext};

pub fn execute_links(ctx: &CommandContext, apply: bool, deep: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let vault = open_vault(&config)?;
    let oracle = if deep { Some(build_oracle(&config)?) } else { None };
    let reconciler = match &oracle {
        Some(oracle) => LinkReconciler::deep(oracle),
        None => LinkReconciler::exact(),
    };

    if ctx.chatty() {
        eprintln!("Scanning for wikilink opportunities...");
    }
    run_pass(ctx, &vault, &reconciler, apply, "Applied {} wikilinks.")
}

pub fn execute_frontmatter(ctx: &CommandContext, apply: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let vault = open_vault(&config)?;

    if ctx.chatty() {
        eprintln!("Scanning frontmatter...");
    }
    run_pass(ctx, &vault, &FrontmatterReconciler, apply, "Updated {} notes.")
}

pub fn execute_structure(ctx: &CommandContext, apply: bool, deep: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let vault = open_vault(&config)?;
    let oracle = if deep { Some(build_oracle(&config)?) } else { None };
    let reconciler = match &oracle {
        Some(oracle) => StructureReconciler::deep(oracle),
        None => StructureReconciler::heuristic(config.folder_rules.clone()),
    };

    if ctx.chatty() {
        eprintln!("Analyzing vault structure...");
    }
    run_pass(ctx, &vault, &reconciler, apply, "Moved {} notes.")
}

/// Scan, preview, and apply when asked. `applied_template` has one `{}` for the count.
fn run_pass<R: Reconciler>(
    ctx: &CommandContext,
    vault: &vaultkeeper_core::Vault,
    reconciler: &R,
    apply: bool,
    applied_template: &str,
) -> Result<()> {
    let start = Instant::now();
    let suggestions = reconciler.scan(vault)?;
    trace_time!(start, "scan", suggestions = suggestions.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !apply || suggestions.is_empty() {
        preview(reconciler, &suggestions, ctx.format(), &mut out)?;
        if !apply && !suggestions.is_empty() && ctx.chatty() {
            writeln!(out)?;
            writeln!(out, "Run with --apply to make changes.")?;
        }
        return Ok(());
    }

    if ctx.format() == OutputFormat::Human {
        preview(reconciler, &suggestions, OutputFormat::Human, &mut out)?;
    }

    let total = suggestions.len();
    let report = reconciler.apply(vault, suggestions);
    trace_time!(start, "apply", applied = report.applied);

    write_report(ctx, &mut out, reconciler.name(), &report, applied_template)?;

    if report.has_failures() {
        return Err(VaultError::Other(format!(
            "{} of {} {} changes failed",
            report.failures.len(),
            total,
            reconciler.name()
        )));
    }
    Ok(())
}

fn write_report(
    ctx: &CommandContext,
    out: &mut dyn Write,
    kind: &str,
    report: &ApplyReport,
    applied_template: &str,
) -> Result<()> {
    match ctx.format() {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(report)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("kind".to_string(), kind.into());
            }
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)?;
        }
        OutputFormat::Human => {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                applied_template.replace("{}", &report.applied.to_string())
            )?;
            if !ctx.cli.quiet {
                for skipped in &report.skipped {
                    writeln!(out, "  skipped {}: {}", skipped.note, skipped.reason)?;
                }
            }
            for failure in &report.failures {
                writeln!(out, "  failed {}: {}", failure.note, failure.error)?;
            }
        }
    }
    Ok(())
}
