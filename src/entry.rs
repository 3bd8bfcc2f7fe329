//! Remote tree entries and the values exchanged with a store

use std::cmp::Ordering;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Remote path separator
pub const PATH_SEPARATOR: &str = "/";

/// One node (file or directory) of the remote tree, as returned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Leaf name
    pub name: String,
    /// Full remote path
    pub path: String,
    pub is_dir: bool,
    /// Size in bytes, meaningless for directories
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Whole-file checksum, may be empty
    #[serde(default)]
    pub content_hash: String,
    /// Per-block checksums. With more than one block the whole-file hash
    /// is not guaranteed to be authoritative.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_list: Vec<String>,
    /// System id assigned by the store
    pub fs_id: u64,
    /// Id of the application that owns the entry
    pub app_id: u64,
}

impl Entry {
    /// Create a file entry with the given size and zeroed metadata.
    pub fn file(path: &str, size: u64) -> Self {
        Self::new(path, false, size)
    }

    /// Create a directory entry with zeroed metadata.
    pub fn dir(path: &str) -> Self {
        Self::new(path, true, 0)
    }

    fn new(path: &str, is_dir: bool, size: u64) -> Self {
        let name = path
            .rsplit(PATH_SEPARATOR)
            .find(|s| !s.is_empty())
            .unwrap_or(PATH_SEPARATOR)
            .to_string();
        Self {
            name,
            path: path.to_string(),
            is_dir,
            size,
            created: DateTime::<Utc>::UNIX_EPOCH,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            content_hash: String::new(),
            block_list: Vec::new(),
            fs_id: 0,
            app_id: 0,
        }
    }

    pub fn with_hash(mut self, hash: &str, blocks: usize) -> Self {
        self.content_hash = hash.to_string();
        self.block_list = (0..blocks).map(|i| format!("{}-{}", hash, i)).collect();
        self
    }

    pub fn with_ids(mut self, fs_id: u64, app_id: u64) -> Self {
        self.fs_id = fs_id;
        self.app_id = app_id;
        self
    }

    pub fn with_times(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    /// True when the file is stored as several blocks, in which case the
    /// reported whole-file hash may be wrong.
    pub fn hash_may_be_incorrect(&self) -> bool {
        self.block_list.len() > 1
    }
}

/// Ordered result of one listing or search call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList(Vec<Entry>);

impl EntryList {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self(entries)
    }

    /// Count files and directories, returned as `(files, directories)`.
    pub fn count(&self) -> (u64, u64) {
        let dirs = self.0.iter().filter(|e| e.is_dir).count() as u64;
        (self.0.len() as u64 - dirs, dirs)
    }

    /// Sum of sizes over file entries only.
    pub fn total_size(&self) -> u64 {
        self.0.iter().filter(|e| !e.is_dir).map(|e| e.size).sum()
    }

    pub fn into_inner(self) -> Vec<Entry> {
        self.0
    }
}

impl Deref for EntryList {
    type Target = [Entry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Entry>> for EntryList {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<Entry> for EntryList {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sort key for directory listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrderBy {
    #[default]
    Name,
    Time,
    Size,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Listing order preference forwarded to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderOptions {
    pub by: OrderBy,
    pub direction: Direction,
}

impl OrderOptions {
    /// Sort entries in place: directories first, then by key within each group.
    pub fn sort(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| {
            b.is_dir.cmp(&a.is_dir).then_with(|| {
                let ord = self.compare(a, b);
                match self.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
        });
    }

    fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self.by {
            OrderBy::Name => a.name.cmp(&b.name),
            OrderBy::Time => a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)),
            OrderBy::Size => a.size.cmp(&b.size).then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// A created share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareResult {
    pub share_id: u64,
    pub link: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShareOptions {
    /// Share all given paths under a single link
    pub combined: bool,
}

/// What to do when an uploaded file already exists at the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPolicy {
    #[default]
    Overwrite,
    Skip,
    Fail,
}
