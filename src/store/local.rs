//! Store backed by a local directory
//!
//! Useful for drives that are mounted or synced locally: the directory given
//! to `LocalStore::new` is the remote root, and remote `/a/b` maps to
//! `<root>/a/b`. Symlinks are skipped to prevent loops out of the root.

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, Metadata};
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryList, OrderOptions, ShareOptions, ShareResult, UploadPolicy};
use crate::error::{StoreError, StoreResult};
use crate::paths;

use super::{RemoteStore, Transfer, name_matches, share_password};

/// Directory under the root holding store bookkeeping; never listed.
const STATE_DIR: &str = ".drivetree";
const SHARES_FILE: &str = "shares.json";

/// A share as persisted in the shares file.
#[derive(Debug, Serialize, Deserialize)]
struct ShareRecord {
    share_id: u64,
    paths: Vec<String>,
    link: String,
    password: String,
    created: DateTime<Utc>,
}

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::NotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a remote path onto the local filesystem.
    fn local_path(&self, remote: &str) -> PathBuf {
        let normalized = paths::normalize(remote);
        paths::segments(&normalized).fold(self.root.clone(), |acc, s| acc.join(s))
    }

    /// Resolve a remote directory, failing if it is missing or a file.
    fn local_dir(&self, remote: &str) -> StoreResult<PathBuf> {
        let local = self.local_path(remote);
        match fs::symlink_metadata(&local) {
            Ok(meta) if meta.is_dir() => Ok(local),
            Ok(_) => Err(StoreError::NotADirectory(remote.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(remote.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn is_state_dir(&self, path: &Path) -> bool {
        path == self.root.join(STATE_DIR)
    }

    /// Read the direct children of a local directory as entries.
    fn read_entries(&self, local: &Path, remote: &str) -> StoreResult<Vec<Entry>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(local)? {
            let dir_entry = dir_entry?;
            let entry_path = dir_entry.path();
            let meta = dir_entry.metadata()?;

            // Skip symlinks to prevent infinite loops and escaping the root
            if meta.file_type().is_symlink() || self.is_state_dir(&entry_path) {
                continue;
            }

            let name = dir_entry.file_name().to_string_lossy().to_string();
            let remote_path = paths::join(remote, &name);
            entries.push(entry_from_metadata(name, remote_path, &meta));
        }
        Ok(entries)
    }

    fn search_dir(
        &self,
        local: &Path,
        remote: &str,
        keyword: &str,
        recursive: bool,
        found: &mut Vec<Entry>,
    ) -> StoreResult<()> {
        for entry in self.read_entries(local, remote)? {
            if recursive && entry.is_dir {
                let child = local.join(&entry.name);
                self.search_dir(&child, &entry.path, keyword, recursive, found)?;
            }
            if name_matches(&entry.name, keyword) {
                found.push(entry);
            }
        }
        Ok(())
    }

    fn shares_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(SHARES_FILE)
    }

    fn load_shares(&self) -> StoreResult<Vec<ShareRecord>> {
        let path = self.shares_path();
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StoreError::Other(format!("corrupt shares file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save_shares(&self, shares: &[ShareRecord]) -> StoreResult<()> {
        let path = self.shares_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(shares)
            .map_err(|e| StoreError::Other(e.to_string()))?;
        fs::write(&path, json)?;
        Ok(())
    }
}

fn entry_from_metadata(name: String, path: String, meta: &Metadata) -> Entry {
    let modified: DateTime<Utc> = meta
        .modified()
        .map(DateTime::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let created: DateTime<Utc> = meta.created().map(DateTime::from).unwrap_or(modified);

    Entry {
        fs_id: file_id(&path, meta),
        name,
        path,
        is_dir: meta.is_dir(),
        size: if meta.is_dir() { 0 } else { meta.len() },
        created,
        modified,
        content_hash: String::new(),
        block_list: Vec::new(),
        app_id: 0,
    }
}

#[cfg(unix)]
fn file_id(_path: &str, meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.ino()
}

#[cfg(not(unix))]
fn file_id(path: &str, _meta: &Metadata) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

impl RemoteStore for LocalStore {
    fn list(&self, path: &str, order: Option<&OrderOptions>) -> StoreResult<EntryList> {
        let remote = paths::normalize(path);
        let local = self.local_dir(&remote)?;
        trace!("local list {} -> {}", remote, local.display());

        let mut entries = self.read_entries(&local, &remote)?;
        order.copied().unwrap_or_default().sort(&mut entries);
        Ok(EntryList::new(entries))
    }

    fn search(&self, path: &str, keyword: &str, recursive: bool) -> StoreResult<EntryList> {
        let remote = paths::normalize(path);
        let local = self.local_dir(&remote)?;
        debug!("searching {} for '{}' (recursive: {})", remote, keyword, recursive);

        let mut found = Vec::new();
        self.search_dir(&local, &remote, keyword, recursive, &mut found)?;
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(EntryList::new(found))
    }

    fn share(&self, targets: &[String], options: &ShareOptions) -> StoreResult<ShareResult> {
        if targets.is_empty() {
            return Err(StoreError::InvalidPath("nothing to share".to_string()));
        }
        if targets.len() > 1 && !options.combined {
            return Err(StoreError::Other(
                "sharing several paths requires a combined share".to_string(),
            ));
        }

        let normalized: Vec<String> = targets.iter().map(|p| paths::normalize(p)).collect();
        for path in &normalized {
            if !self.local_path(path).exists() {
                return Err(StoreError::NotFound(path.clone()));
            }
        }

        let mut shares = self.load_shares()?;
        let share_id = shares.iter().map(|s| s.share_id).max().unwrap_or(0) + 1;

        let mut hasher = DefaultHasher::new();
        normalized.hash(&mut hasher);
        share_id.hash(&mut hasher);

        let target = fs::canonicalize(self.local_path(&normalized[0]))?;
        let record = ShareRecord {
            share_id,
            paths: normalized,
            link: format!("file://{}", target.display()),
            password: share_password(hasher.finish()),
            created: Utc::now(),
        };
        let result = ShareResult {
            share_id,
            link: record.link.clone(),
            password: record.password.clone(),
        };

        shares.push(record);
        self.save_shares(&shares)?;
        debug!("created share {} -> {}", result.share_id, result.link);
        Ok(result)
    }
}

impl Transfer for LocalStore {
    fn upload(
        &self,
        files: &[PathBuf],
        remote_dir: &str,
        policy: UploadPolicy,
    ) -> StoreResult<()> {
        let remote_dir = paths::normalize(remote_dir);
        let local_dir = self.local_dir(&remote_dir)?;

        for file in files {
            let name = file
                .file_name()
                .ok_or_else(|| StoreError::InvalidPath(file.display().to_string()))?;
            let target = local_dir.join(name);

            if target.exists() {
                let remote = paths::join(&remote_dir, &name.to_string_lossy());
                match policy {
                    UploadPolicy::Overwrite => debug!("overwriting {}", remote),
                    UploadPolicy::Skip => {
                        debug!("skipping existing {}", remote);
                        continue;
                    }
                    UploadPolicy::Fail => return Err(StoreError::AlreadyExists(remote)),
                }
            }

            let bytes = fs::copy(file, &target)?;
            debug!("uploaded {} ({} bytes) to {}", file.display(), bytes, remote_dir);
        }
        Ok(())
    }
}
