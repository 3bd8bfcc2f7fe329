//! Command orchestration: resolve a path, then list, search or index it
//!
//! Each command takes the store, an output writer and the working directory
//! explicitly. Nothing is printed outside `out`, which keeps the commands
//! testable against an in-memory store and a plain buffer.

use std::path::PathBuf;

use log::{debug, info};
use termcolor::WriteColor;

use crate::entry::{OrderOptions, ShareOptions, ShareResult, UploadPolicy};
use crate::error::{Error, Result};
use crate::index::{BuildOutcome, CancellationToken, IndexBuilder, Throttle, build_index_file};
use crate::output::{Operation, RULE, render_listing, write_json};
use crate::paths;
use crate::pattern::resolve_path;
use crate::stats::Aggregate;
use crate::store::{RemoteStore, Transfer};

/// Default file name suffix of index files.
pub const DEFAULT_INDEX_SUFFIX: &str = "_index.txt";

/// Index name used when indexing the store root.
pub const ROOT_INDEX_NAME: &str = "root";

#[derive(Debug, Clone, Copy, Default)]
pub struct LsOptions {
    /// Show ids, timestamps and hashes
    pub show_totals: bool,
    pub order: OrderOptions,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub show_totals: bool,
    pub recursive: bool,
    pub json: bool,
}

/// Settings for `createfileindex`.
pub struct IndexOptions<'a> {
    /// Local directory the index file is written to
    pub output_dir: PathBuf,
    /// Appended to the indexed directory's name to form the file name
    pub suffix: String,
    /// Pause taken before descending into each subdirectory
    pub throttle: &'a dyn Throttle,
    /// Checked during the build; a cancelled build leaves no index file
    pub cancel: CancellationToken,
}

/// What `createfileindex` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub index_path: PathBuf,
    /// The index file already existed and was uploaded as-is
    pub reused: bool,
    /// Totals of a fresh build; `None` when reused
    pub aggregate: Option<Aggregate>,
    pub share: ShareResult,
}

/// File name of the index for a remote directory.
pub fn index_file_name(remote_path: &str, suffix: &str) -> String {
    format!("{}{}", display_name(remote_path), suffix)
}

fn display_name(remote_path: &str) -> &str {
    paths::file_name(remote_path).unwrap_or(ROOT_INDEX_NAME)
}

/// `ls`: list one remote directory.
pub fn run_listing<S, W>(
    store: &S,
    out: &mut W,
    cwd: &str,
    path: &str,
    options: &LsOptions,
) -> Result<Aggregate>
where
    S: RemoteStore + ?Sized,
    W: WriteColor,
{
    let resolved = resolve_path(store, cwd, path)?;
    let listing = store
        .list(&resolved, Some(&options.order))
        .map_err(|e| Error::listing(&resolved, e))?;

    if options.json {
        write_json(out, &listing)?;
        return Ok(Aggregate::of(&listing));
    }

    writeln!(out)?;
    writeln!(out, "current directory: {}", resolved)?;
    writeln!(out, "{}", RULE)?;
    let totals = render_listing(
        out,
        Operation::Listing,
        options.show_totals,
        &resolved,
        &listing,
    )?;
    Ok(totals)
}

/// `search`: find entries whose name contains `keyword` below a directory.
pub fn run_search<S, W>(
    store: &S,
    out: &mut W,
    cwd: &str,
    path: &str,
    keyword: &str,
    options: &SearchOptions,
) -> Result<Aggregate>
where
    S: RemoteStore + ?Sized,
    W: WriteColor,
{
    let resolved = resolve_path(store, cwd, path)?;
    debug!(
        "search {} for '{}' (recursive: {})",
        resolved, keyword, options.recursive
    );
    let found = store
        .search(&resolved, keyword, options.recursive)
        .map_err(|e| Error::listing(&resolved, e))?;

    if options.json {
        write_json(out, &found)?;
        return Ok(Aggregate::of(&found));
    }

    let totals = render_listing(
        out,
        Operation::Search,
        options.show_totals,
        &resolved,
        &found,
    )?;
    Ok(totals)
}

/// `createfileindex`: build an index of a remote directory, upload it into
/// that directory and share the directory.
///
/// An index file that already exists locally is uploaded as-is. Upload and
/// share failures abort the remaining steps.
pub fn run_create_index<S, W>(
    store: &S,
    out: &mut W,
    cwd: &str,
    path: &str,
    options: &IndexOptions<'_>,
) -> Result<IndexReport>
where
    S: RemoteStore + Transfer + ?Sized,
    W: WriteColor,
{
    let resolved = resolve_path(store, cwd, path)?;
    let name = display_name(&resolved);
    let index_path = options
        .output_dir
        .join(index_file_name(&resolved, &options.suffix));

    writeln!(out, "[1/3] building index of {}", resolved)?;
    let builder =
        IndexBuilder::new(store, options.throttle).with_cancellation(options.cancel.clone());
    let (reused, aggregate) = match build_index_file(&builder, &resolved, name, &index_path)? {
        BuildOutcome::Created(aggregate) => {
            writeln!(out, "      {} -> {}", aggregate, index_path.display())?;
            (false, Some(aggregate))
        }
        BuildOutcome::Reused => {
            writeln!(out, "      reusing existing {}", index_path.display())?;
            (true, None)
        }
    };

    writeln!(out, "[2/3] uploading {} to {}", index_path.display(), resolved)?;
    store
        .upload(
            std::slice::from_ref(&index_path),
            &resolved,
            UploadPolicy::Overwrite,
        )
        .map_err(Error::Upload)?;

    writeln!(out, "[3/3] sharing {}", resolved)?;
    let share = store
        .share(
            std::slice::from_ref(&resolved),
            &ShareOptions { combined: true },
        )
        .map_err(Error::Share)?;
    writeln!(
        out,
        "shareID: {}, link: {}?pwd={}",
        share.share_id, share.link, share.password
    )?;
    info!("shared {} as {}", resolved, share.share_id);

    Ok(IndexReport {
        index_path,
        reused,
        aggregate,
        share,
    })
}
