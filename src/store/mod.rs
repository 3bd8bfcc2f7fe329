//! Store backends
//!
//! The commands only talk to a store through two traits:
//!
//! - `RemoteStore`: list a directory, search below a directory, create share links
//! - `Transfer`: upload local files into a remote directory
//!
//! This keeps the traversal and rendering code independent of where the tree
//! actually lives. Two backends ship with the crate:
//!
//! - `LocalStore`: a local directory (e.g. a mounted or synced drive) acting as the remote root
//! - `MemoryStore`: an in-memory tree for tests and benchmarks

mod local;
mod memory;

use std::path::PathBuf;

use crate::entry::{EntryList, OrderOptions, ShareOptions, ShareResult, UploadPolicy};
use crate::error::StoreResult;

pub use local::LocalStore;
pub use memory::MemoryStore;

/// Directory listing, search and sharing operations of a remote store.
pub trait RemoteStore {
    /// List the direct children of a directory.
    ///
    /// `order` of `None` means the store's default order.
    fn list(&self, path: &str, order: Option<&OrderOptions>) -> StoreResult<EntryList>;

    /// Find entries whose name contains `keyword` below `path`.
    fn search(&self, path: &str, keyword: &str, recursive: bool) -> StoreResult<EntryList>;

    /// Create a share link for the given paths.
    fn share(&self, paths: &[String], options: &ShareOptions) -> StoreResult<ShareResult>;
}

/// Upload operations of a remote store.
pub trait Transfer {
    /// Copy local files into the remote directory `remote_dir`.
    fn upload(&self, files: &[PathBuf], remote_dir: &str, policy: UploadPolicy)
    -> StoreResult<()>;
}

/// Case-insensitive keyword match used by the bundled backends.
pub(crate) fn name_matches(name: &str, keyword: &str) -> bool {
    name.to_lowercase().contains(&keyword.to_lowercase())
}

/// Derive a short share password from a seed.
pub(crate) fn share_password(seed: u64) -> String {
    const ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";
    let mut n = seed;
    (0..4)
        .map(|_| {
            let c = ALPHABET[(n % ALPHABET.len() as u64) as usize] as char;
            n /= ALPHABET.len() as u64;
            c
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_ignores_case() {
        assert!(name_matches("Report.PDF", "report"));
        assert!(name_matches("report.pdf", "PDF"));
        assert!(!name_matches("notes.txt", "report"));
    }

    #[test]
    fn test_share_password_is_stable() {
        assert_eq!(share_password(42), share_password(42));
        assert_eq!(share_password(42).len(), 4);
        assert_ne!(share_password(1), share_password(2));
    }
}
