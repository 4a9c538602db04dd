use crate::support::TestVault;
use predicates::prelude::*;

// ============================================================================
// Interactive commands fail fast on configuration before prompting
// ============================================================================

#[test]
fn test_journal_requires_api_key() {
    let vault = TestVault::new();
    vault
        .cmd()
        .args(["journal", "--type", "meeting"])
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_plan_requires_api_key() {
    let vault = TestVault::new();
    vault
        .cmd()
        .arg("plan")
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_journal_requires_vault() {
    let vault = TestVault::new();
    vault
        .bare_cmd()
        .env("ANTHROPIC_API_KEY", "sk-test")
        .args(["journal", "--type", "reading"])
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("OBSIDIAN_VAULT_PATH"));
}

#[test]
fn test_journal_without_input_exits_cleanly() {
    // EOF at the first prompt ends the session before any request is made
    let vault = TestVault::new();
    vault
        .cmd()
        .env("ANTHROPIC_API_KEY", "sk-test")
        .args(["journal", "--type", "free-form"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("What's on your mind?"))
        .stdout(predicate::str::contains("No input captured."));

    assert!(!vault.exists("Journal"));
}

#[test]
fn test_plan_without_input_leaves_daily_note_alone() {
    let vault = TestVault::new();
    vault.write("Daily Notes/2026-01-15.md", "- [ ] groceries\n");
    vault
        .cmd()
        .env("ANTHROPIC_API_KEY", "sk-test")
        .arg("plan")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Let's plan your day."))
        .stdout(predicate::str::contains("No input captured."));

    assert_eq!(vault.read("Daily Notes/2026-01-15.md"), "- [ ] groceries\n");
}
