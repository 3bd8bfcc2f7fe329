//! Test harness for drivetree integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub use drivetree::test_utils::TestStore;

/// A store root plus a separate working directory for the process.
///
/// Index files land in the working directory by default. The config file
/// lives in its own directory so neither tree is polluted by it, and no user
/// config on the machine is ever read.
pub struct Workspace {
    pub store: TestStore,
    work: TempDir,
    config_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(config_dir.path().join("config.toml"), "").expect("Failed to write config");
        Self {
            store: TestStore::new(),
            work: TempDir::new().expect("Failed to create temp dir"),
            config_dir,
        }
    }

    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// Base command: isolated config, working directory set, no store flag.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_drivetree"));
        cmd.current_dir(self.work.path())
            .env("DRIVETREE_CONFIG", self.config_path())
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Run drivetree against the workspace store.
pub fn run_drivetree(ws: &Workspace, args: &[&str]) -> (String, String, bool) {
    let output = ws
        .command()
        .arg("--store")
        .arg(ws.store.path())
        .args(args)
        .output()
        .expect("Failed to run drivetree");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_dirs() {
        let ws = Workspace::new();
        assert!(ws.store.path().exists());
        assert!(ws.work_dir().exists());
        assert!(ws.config_path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let ws = Workspace::new();
        let file_path = ws.store.add_file("/docs/a.txt", "hello");
        assert!(file_path.exists());
        assert!(file_path.starts_with(ws.store.path()));
    }
}
