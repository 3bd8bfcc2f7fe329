//! Directory-tree index files
//!
//! An index is a plain text rendering of a remote directory tree with a
//! summary on its first line. It is built by [`IndexBuilder`] into an
//! [`IndexWriter`], usually through [`build_index_file`].

mod builder;
mod cancel;
mod throttle;
mod writer;

pub use builder::{BuildOutcome, IndexBuilder, build_index_file};
pub use cancel::CancellationToken;
pub use throttle::{DEFAULT_DELAY, FixedDelay, NoDelay, Throttle, throttle_for};
pub use writer::{BRANCH, HEADER_WIDTH, INDENT, IndexWriter};
