//! In-memory store used by tests and benchmarks

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::PathBuf;

use log::trace;

use crate::entry::{Entry, EntryList, OrderOptions, ShareOptions, ShareResult, UploadPolicy};
use crate::error::{StoreError, StoreResult};
use crate::paths;

use super::{RemoteStore, Transfer, name_matches, share_password};

/// A remote tree held entirely in memory.
///
/// Entries are added with the builder methods; missing parent directories are
/// created on the fly. Listing failures can be injected per path, and every
/// `list` call is recorded so tests can check traversal order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Vec<Entry>>,
    failing: HashSet<String>,
    fail_uploads: bool,
    fail_shares: bool,
    listed: RefCell<Vec<String>>,
    uploads: RefCell<Vec<(PathBuf, String)>>,
    next_id: Cell<u64>,
    shares: Cell<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.insert(Entry::dir(&paths::normalize(path)));
        self
    }

    pub fn with_file(self, path: &str, size: u64) -> Self {
        self.insert(Entry::file(&paths::normalize(path), size));
        self
    }

    /// Add a fully specified entry.
    pub fn with_entry(self, entry: Entry) -> Self {
        self.insert(entry);
        self
    }

    /// Make every `list` of `path` fail.
    pub fn fail_listing(mut self, path: &str) -> Self {
        self.failing.insert(paths::normalize(path));
        self
    }

    pub fn fail_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn fail_shares(mut self) -> Self {
        self.fail_shares = true;
        self
    }

    /// Paths passed to `list`, in call order.
    pub fn listed_paths(&self) -> Vec<String> {
        self.listed.borrow().clone()
    }

    /// Local files uploaded so far with their remote directory.
    pub fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.uploads.borrow().clone()
    }

    pub fn entry(&self, path: &str) -> Option<Entry> {
        let path = paths::normalize(path);
        self.entries.borrow().iter().find(|e| e.path == path).cloned()
    }

    fn insert(&self, mut entry: Entry) {
        if entry.path == "/" {
            return;
        }
        if let Some((parent, _)) = entry.path.rsplit_once('/') {
            if !parent.is_empty() && self.entry(parent).is_none() {
                self.insert(Entry::dir(parent));
            }
        }

        if entry.fs_id == 0 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            entry.fs_id = id;
        }

        let mut entries = self.entries.borrow_mut();
        entries.retain(|e| e.path != entry.path);
        entries.push(entry);
    }

    fn check_dir(&self, path: &str) -> StoreResult<()> {
        if path == "/" {
            return Ok(());
        }
        match self.entry(path) {
            Some(e) if e.is_dir => Ok(()),
            Some(_) => Err(StoreError::NotADirectory(path.to_string())),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    fn children(&self, path: &str) -> Vec<Entry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| parent_of(&e.path) == path)
            .cloned()
            .collect()
    }
}

fn parent_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "",
    }
}

impl RemoteStore for MemoryStore {
    fn list(&self, path: &str, order: Option<&OrderOptions>) -> StoreResult<EntryList> {
        let path = paths::normalize(path);
        trace!("memory list {}", path);
        self.listed.borrow_mut().push(path.clone());

        if self.failing.contains(&path) {
            return Err(StoreError::Other(format!("listing {} refused", path)));
        }
        self.check_dir(&path)?;

        let mut children = self.children(&path);
        order.copied().unwrap_or_default().sort(&mut children);
        Ok(EntryList::new(children))
    }

    fn search(&self, path: &str, keyword: &str, recursive: bool) -> StoreResult<EntryList> {
        let path = paths::normalize(path);
        self.check_dir(&path)?;

        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        };

        let mut found: Vec<Entry> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| {
                if recursive {
                    e.path.starts_with(&prefix)
                } else {
                    parent_of(&e.path) == path
                }
            })
            .filter(|e| name_matches(&e.name, keyword))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(EntryList::new(found))
    }

    fn share(&self, targets: &[String], options: &ShareOptions) -> StoreResult<ShareResult> {
        if self.fail_shares {
            return Err(StoreError::Other("sharing disabled".to_string()));
        }
        if targets.is_empty() {
            return Err(StoreError::InvalidPath("nothing to share".to_string()));
        }
        if targets.len() > 1 && !options.combined {
            return Err(StoreError::Other(
                "sharing several paths requires a combined share".to_string(),
            ));
        }
        for path in targets {
            let path = paths::normalize(path);
            if path != "/" && self.entry(&path).is_none() {
                return Err(StoreError::NotFound(path));
            }
        }

        let share_id = self.shares.get() + 1;
        self.shares.set(share_id);
        Ok(ShareResult {
            share_id,
            link: format!("memory://share/{}", share_id),
            password: share_password(share_id),
        })
    }
}

impl Transfer for MemoryStore {
    fn upload(
        &self,
        files: &[PathBuf],
        remote_dir: &str,
        policy: UploadPolicy,
    ) -> StoreResult<()> {
        if self.fail_uploads {
            return Err(StoreError::Other("upload refused".to_string()));
        }
        let remote_dir = paths::normalize(remote_dir);
        self.check_dir(&remote_dir)?;

        for file in files {
            let size = std::fs::metadata(file)?.len();
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| StoreError::InvalidPath(file.display().to_string()))?;
            let target = paths::join(&remote_dir, &name);

            if self.entry(&target).is_some() {
                match policy {
                    UploadPolicy::Overwrite => {}
                    UploadPolicy::Skip => continue,
                    UploadPolicy::Fail => return Err(StoreError::AlreadyExists(target)),
                }
            }

            self.insert(Entry::file(&target, size));
            self.uploads
                .borrow_mut()
                .push((file.clone(), remote_dir.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_file("/docs/a.txt", 1024)
            .with_file("/docs/sub/b.txt", 2048)
            .with_file("/docs/sub/report.pdf", 10)
    }

    #[test]
    fn test_parents_created_implicitly() {
        let store = store();
        assert!(store.entry("/docs").is_some_and(|e| e.is_dir));
        assert!(store.entry("/docs/sub").is_some_and(|e| e.is_dir));
    }

    #[test]
    fn test_list_directories_first() {
        let list = store().list("/docs", None).unwrap();
        let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sub", "a.txt"]);
    }

    #[test]
    fn test_list_errors() {
        let store = store().fail_listing("/docs/sub");
        assert!(store.list("/missing", None).unwrap_err().is_not_found());
        assert!(matches!(
            store.list("/docs/a.txt", None),
            Err(StoreError::NotADirectory(_))
        ));
        assert!(store.list("/docs/sub", None).is_err());
        assert_eq!(
            store.listed_paths(),
            vec!["/missing", "/docs/a.txt", "/docs/sub"]
        );
    }

    #[test]
    fn test_search_recursive_and_shallow() {
        let store = store();
        let deep = store.search("/docs", "TXT", true).unwrap();
        let paths: Vec<&str> = deep.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/docs/a.txt", "/docs/sub/b.txt"]);

        let shallow = store.search("/docs", "txt", false).unwrap();
        assert_eq!(shallow.len(), 1);
    }

    #[test]
    fn test_share() {
        let store = store();
        let combined = ShareOptions { combined: true };
        let share = store.share(&["/docs".to_string()], &combined).unwrap();
        assert_eq!(share.share_id, 1);
        assert_eq!(share.password.len(), 4);

        let two = vec!["/docs".to_string(), "/docs/sub".to_string()];
        assert!(store.share(&two, &ShareOptions::default()).is_err());
        assert!(store.share(&two, &combined).is_ok());
        assert!(
            store
                .share(&["/nope".to_string()], &combined)
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_upload_policies() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("a.txt");
        std::fs::write(&local, "hello").unwrap();
        let store = store();

        store
            .upload(&[local.clone()], "/docs", UploadPolicy::Skip)
            .unwrap();
        assert_eq!(store.entry("/docs/a.txt").unwrap().size, 1024);

        assert!(matches!(
            store.upload(&[local.clone()], "/docs", UploadPolicy::Fail),
            Err(StoreError::AlreadyExists(_))
        ));

        store
            .upload(&[local.clone()], "/docs", UploadPolicy::Overwrite)
            .unwrap();
        assert_eq!(store.entry("/docs/a.txt").unwrap().size, 5);
        assert_eq!(store.uploads().len(), 1);
    }
}
