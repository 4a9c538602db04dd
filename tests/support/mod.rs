use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables that would leak the developer's own setup into a test run
const ISOLATED_VARS: &[&str] = &[
    "OBSIDIAN_VAULT_PATH",
    "ANTHROPIC_API_KEY",
    "VAULTKEEPER_MODEL",
    "VAULTKEEPER_MAX_ROUNDS",
    "VAULTKEEPER_LATITUDE",
    "VAULTKEEPER_LONGITUDE",
    "VAULTKEEPER_LOG",
    "RUST_LOG",
];

/// A throwaway working directory holding a vault and an empty config dir
pub struct TestVault {
    pub dir: TempDir,
}

impl TestVault {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("vault")).unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        TestVault { dir }
    }

    /// Vault with a daily note, a root tutorial note and a bare scratch note
    pub fn with_sample_notes() -> Self {
        let vault = Self::new();
        vault.write("Daily Notes/2026-01-15.md", "Worked on Project Atlas today.\n");
        vault.write("Project Atlas.md", "A tutorial for the Atlas rollout.\n");
        vault.write("Scratch.md", "Nothing to see.\n");
        vault
    }

    pub fn workdir(&self) -> &Path {
        self.dir.path()
    }

    pub fn vault_path(&self) -> PathBuf {
        self.dir.path().join("vault")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.vault_path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.vault_path().join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.vault_path().join(rel).exists()
    }

    /// Command with no vault configured
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("vaultkeeper");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.workdir())
            .env("VAULTKEEPER_CONFIG_DIR", self.config_dir());
        cmd
    }

    /// Command pointed at this vault
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.env("OBSIDIAN_VAULT_PATH", self.vault_path());
        cmd
    }
}
