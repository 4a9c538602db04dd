use crate::support::TestVault;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_config_show_masks_api_key() {
    let vault = TestVault::new();
    vault
        .cmd()
        .env("ANTHROPIC_API_KEY", "sk-test-abcd1234")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********...1234"))
        .stdout(predicate::str::contains("sk-test").not())
        .stdout(predicate::str::contains("claude-sonnet-4-20250514"))
        .stdout(predicate::str::contains("Max rounds:    4"));
}

#[test]
fn test_config_show_json() {
    let vault = TestVault::new();
    let output = vault
        .cmd()
        .env("VAULTKEEPER_MAX_ROUNDS", "6")
        .env("VAULTKEEPER_LATITUDE", "41.88")
        .env("VAULTKEEPER_LONGITUDE", "-87.63")
        .args(["--format", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["api_key"], "(not set)");
    assert_eq!(value["max_rounds"], 6);
    assert_eq!(value["latitude"], 41.88);
    assert_eq!(value["journal_folder"], "Journal");
    assert_eq!(value["folder_rules"][1]["folder"], "Documentation");
}

#[test]
fn test_config_file_supplies_vault_path() {
    let vault = TestVault::new();
    fs::write(
        vault.config_dir().join("config.toml"),
        format!(
            "vault_path = {:?}\nmodel = \"claude-test\"\njournal_folder = \"Reflections\"\n",
            vault.vault_path().display().to_string()
        ),
    )
    .unwrap();

    vault
        .bare_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("claude-test"))
        .stdout(predicate::str::contains("Reflections"));
}

#[test]
fn test_invalid_max_rounds() {
    let vault = TestVault::new();
    vault
        .cmd()
        .env("VAULTKEEPER_MAX_ROUNDS", "0")
        .args(["config", "show"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("max_rounds"));
}

#[test]
fn test_config_set_writes_env_file() {
    let vault = TestVault::new();
    let env_path = vault.workdir().join(".env");
    fs::write(&env_path, "# local settings\nVAULTKEEPER_MODEL=old\n").unwrap();

    vault
        .bare_cmd()
        .args(["config", "set", "VAULTKEEPER_MODEL", "claude-new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set VAULTKEEPER_MODEL in .env"));
    vault
        .bare_cmd()
        .args(["config", "set", "VAULTKEEPER_MAX_ROUNDS", "5"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&env_path).unwrap(),
        "# local settings\nVAULTKEEPER_MODEL=claude-new\nVAULTKEEPER_MAX_ROUNDS=5\n"
    );
}

#[test]
fn test_config_set_feeds_later_runs() {
    let vault = TestVault::new();
    vault
        .bare_cmd()
        .args([
            "config",
            "set",
            "OBSIDIAN_VAULT_PATH",
            &vault.vault_path().display().to_string(),
        ])
        .assert()
        .success();

    vault
        .bare_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault path:"));
}

#[test]
fn test_config_set_rejects_bad_key() {
    let vault = TestVault::new();
    vault
        .bare_cmd()
        .args(["config", "set", "BAD KEY", "x"])
        .assert()
        .code(2);
    assert!(!vault.workdir().join(".env").exists());
}
