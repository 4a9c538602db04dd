use crate::support::TestVault;
use predicates::prelude::*;
use std::fs;

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_vault_setting() {
    let vault = TestVault::new();
    vault
        .bare_cmd()
        .args(["organize", "links"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("OBSIDIAN_VAULT_PATH"));
}

#[test]
fn test_nonexistent_vault_as_json() {
    let vault = TestVault::new();
    let output = vault
        .bare_cmd()
        .env("OBSIDIAN_VAULT_PATH", vault.workdir().join("missing"))
        .args(["--format", "json", "organize", "frontmatter"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["type"], "vault_not_found");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_deep_structure_requires_api_key() {
    let vault = TestVault::with_sample_notes();
    vault
        .cmd()
        .args(["organize", "structure", "--deep"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

// ============================================================================
// Frontmatter
// ============================================================================

#[test]
fn test_frontmatter_preview_does_not_write() {
    let vault = TestVault::with_sample_notes();
    vault
        .cmd()
        .args(["organize", "frontmatter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontmatter updates (1 notes)"))
        .stdout(predicate::str::contains("2026-01-15"))
        .stdout(predicate::str::contains("type: daily"))
        .stdout(predicate::str::contains("Run with --apply to make changes."));

    assert_eq!(
        vault.read("Daily Notes/2026-01-15.md"),
        "Worked on Project Atlas today.\n"
    );
}

#[test]
fn test_frontmatter_apply_is_idempotent() {
    let vault = TestVault::with_sample_notes();
    vault
        .cmd()
        .args(["organize", "frontmatter", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1 notes."));

    let content = vault.read("Daily Notes/2026-01-15.md");
    assert!(content.starts_with("---\n"));
    assert!(content.contains("2026-01-15"));
    assert!(content.contains("type: daily"));
    assert!(content.contains("Worked on Project Atlas today."));
    assert_eq!(vault.read("Scratch.md"), "Nothing to see.\n");

    vault
        .cmd()
        .args(["organize", "frontmatter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All notes have complete frontmatter."))
        .stdout(predicate::str::contains("--apply").not());
}

#[test]
fn test_frontmatter_inline_tags() {
    let vault = TestVault::new();
    vault.write("Meeting.md", "Tags: #work #urgent\nDiscussed roadmap.\n");

    vault
        .cmd()
        .args(["--quiet", "organize", "frontmatter", "--apply"])
        .assert()
        .success();

    let content = vault.read("Meeting.md");
    assert!(content.contains("- work"));
    assert!(content.contains("- urgent"));
    assert!(content.contains("Discussed roadmap."));
    assert!(!content.contains("#work"));
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_links_preview_as_json() {
    let vault = TestVault::with_sample_notes();
    let output = vault
        .cmd()
        .args(["--format", "json", "organize", "links"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["kind"], "links");
    assert_eq!(value["count"], 1);
    let suggestion = &value["suggestions"][0];
    assert_eq!(suggestion["title_to_link"], "Project Atlas");
    assert_eq!(suggestion["note"]["title"], "2026-01-15");
    assert_eq!(suggestion["context"]["kind"], "line");
}

#[test]
fn test_links_apply() {
    let vault = TestVault::with_sample_notes();
    vault
        .cmd()
        .args(["organize", "links", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 wikilinks."));

    assert!(vault
        .read("Daily Notes/2026-01-15.md")
        .contains("Worked on [[Project Atlas]] today."));

    vault
        .cmd()
        .args(["organize", "links"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No new wikilinks to suggest."));
}

#[test]
fn test_links_ignore_reserved_folders() {
    let vault = TestVault::with_sample_notes();
    vault.write("Templates/Daily.md", "Mentions Project Atlas.\n");
    vault.write(".obsidian/notes.md", "Mentions Project Atlas.\n");

    let output = vault
        .cmd()
        .args(["--format", "json", "organize", "links"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["count"], 1);
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_structure_preview_and_apply() {
    let vault = TestVault::with_sample_notes();
    vault
        .cmd()
        .args(["organize", "structure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Structure suggestions (1)"))
        .stdout(predicate::str::contains("Documentation"))
        .stdout(predicate::str::contains("keyword match: 'tutorial'"));
    assert!(vault.exists("Project Atlas.md"));

    vault
        .cmd()
        .args(["organize", "structure", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved 1 notes."));

    assert!(!vault.exists("Project Atlas.md"));
    assert_eq!(
        vault.read("Documentation/Project Atlas.md"),
        "A tutorial for the Atlas rollout.\n"
    );
    assert!(vault.exists("Scratch.md"));
}

#[test]
fn test_structure_move_never_overwrites() {
    let vault = TestVault::with_sample_notes();
    vault.write("Documentation/Project Atlas.md", "Existing guide.\n");

    let output = vault
        .cmd()
        .args(["--format", "json", "organize", "structure", "--apply"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    assert_eq!(report["kind"], "structure");
    assert_eq!(report["applied"], 0);
    assert_eq!(report["failures"].as_array().unwrap().len(), 1);

    assert_eq!(
        vault.read("Documentation/Project Atlas.md"),
        "Existing guide.\n"
    );
    assert!(vault.exists("Project Atlas.md"));
}

#[test]
fn test_structure_rules_from_config_file() {
    let vault = TestVault::with_sample_notes();
    fs::write(
        vault.config_dir().join("config.toml"),
        "[[structure.folders]]\nfolder = \"Projects\"\nkeywords = [\"atlas\"]\n",
    )
    .unwrap();

    vault
        .cmd()
        .args(["organize", "structure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Projects"))
        .stdout(predicate::str::contains("keyword match: 'atlas'"));
}

#[test]
fn test_invalid_config_file() {
    let vault = TestVault::with_sample_notes();
    fs::write(vault.config_dir().join("config.toml"), "colour = \"blue\"\n").unwrap();

    vault
        .cmd()
        .args(["organize", "structure"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid configuration"));
}
