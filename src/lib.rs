//! drivetree - list, search and index a remote drive tree

pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod index;
pub mod output;
pub mod paths;
pub mod pattern;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use commands::{
    IndexOptions, IndexReport, LsOptions, SearchOptions, run_create_index, run_listing, run_search,
};
pub use config::Config;
pub use entry::{Entry, EntryList, OrderBy, OrderOptions};
pub use error::{Error, Result, StoreError};
pub use format::format_size;
pub use index::{BuildOutcome, CancellationToken, IndexBuilder, IndexWriter, build_index_file};
pub use output::{Operation, Table, render_listing};
pub use stats::Aggregate;
pub use store::{LocalStore, MemoryStore, RemoteStore, Transfer};
