//! Test utilities for creating temporary on-disk stores.
//!
//! This module is only compiled for tests, benchmarks and the `test-utils`
//! feature.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::store::LocalStore;

/// A temporary directory laid out as a store root.
///
/// Remote path `/a/b` lives at `<path>/a/b`. The directory is removed when
/// dropped.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    /// Create a new empty store root.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the store root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file with the given content.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.local(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a file of `size` zero bytes.
    pub fn add_sized_file(&self, path: &str, size: usize) -> PathBuf {
        self.add_file(path, &"\0".repeat(size))
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.local(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Open the directory as a `LocalStore`.
    pub fn store(&self) -> LocalStore {
        LocalStore::new(self.dir.path()).expect("Failed to open store")
    }

    fn local(&self, path: &str) -> PathBuf {
        self.dir.path().join(path.trim_start_matches('/'))
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}
