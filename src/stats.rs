//! Running totals over listed entries
//!
//! An `Aggregate` is created by the operation that needs it, folded as
//! listings come back, read once for the summary and then dropped. Nothing
//! here is global, so repeated or concurrent operations never share totals.

use std::fmt;

use serde::Serialize;

use crate::entry::EntryList;
use crate::format::format_size;

/// File count, directory count and total file size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub files: u64,
    pub directories: u64,
    /// Sum of file sizes in bytes
    pub total_size: u64,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an aggregate from a single listing.
    pub fn of(list: &EntryList) -> Self {
        let mut aggregate = Self::new();
        aggregate.fold(list);
        aggregate
    }

    /// Fold every entry of a listing into the totals.
    pub fn fold(&mut self, list: &EntryList) {
        let (files, directories) = list.count();
        self.files += files;
        self.directories += directories;
        self.total_size += list.total_size();
    }

    /// Record a single file.
    pub fn record_file(&mut self, size: u64) {
        self.files += 1;
        self.total_size += size;
    }

    /// Record a single directory.
    pub fn record_directory(&mut self) {
        self.directories += 1;
    }

    /// Add another aggregate's totals to this one.
    pub fn merge(&mut self, other: &Aggregate) {
        self.files += other.files;
        self.directories += other.directories;
        self.total_size += other.total_size;
    }

    /// Number of entries folded so far.
    pub fn entries(&self) -> u64 {
        self.files + self.directories
    }

    /// `files: F, directories: D`, as used in the table totals row.
    pub fn counts_label(&self) -> String {
        format!("files: {}, directories: {}", self.files, self.directories)
    }

    /// `directories: D, files: F, size: S`, as written to the index header.
    pub fn summary(&self) -> String {
        format!(
            "directories: {}, files: {}, size: {}",
            self.directories,
            self.files,
            format_size(self.total_size)
        )
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
