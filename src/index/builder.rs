//! IndexBuilder - depth-first walk of a remote directory into an index document

use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::stats::Aggregate;
use crate::store::RemoteStore;

use super::cancel::CancellationToken;
use super::throttle::Throttle;
use super::writer::IndexWriter;

/// Result of [`build_index_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// A new index was written with these totals.
    Created(Aggregate),
    /// An index already existed at the destination and was left untouched.
    Reused,
}

/// Walks a remote tree and emits one line per entry.
///
/// The walk is sequential. Before descending into each subdirectory the
/// builder pauses through its [`Throttle`] and checks the cancellation token,
/// so a long build can be slowed down for rate-limited stores and interrupted
/// cleanly.
pub struct IndexBuilder<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    throttle: &'a dyn Throttle,
    cancel: CancellationToken,
}

impl<'a, S: RemoteStore + ?Sized> IndexBuilder<'a, S> {
    pub fn new(store: &'a S, throttle: &'a dyn Throttle) -> Self {
        Self {
            store,
            throttle,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk `path`, shown as `name` on the first tree line, into `sink`.
    ///
    /// Returns the totals over every entry below `path`. The header line is
    /// not rewritten here; see [`IndexWriter::finish`]. Failed sink writes
    /// are reported as [`Error::Io`] at the writer's location.
    pub fn build<W: Write + Seek>(
        &self,
        sink: &mut IndexWriter<W>,
        path: &str,
        name: &str,
    ) -> Result<Aggregate> {
        let mut aggregate = Aggregate::new();
        self.visit(sink, path, name, 1, &mut aggregate)?;
        Ok(aggregate)
    }

    fn visit<W: Write + Seek>(
        &self,
        sink: &mut IndexWriter<W>,
        path: &str,
        name: &str,
        level: usize,
        aggregate: &mut Aggregate,
    ) -> Result<()> {
        self.cancel.check()?;
        sink.write_dir(level, name)
            .map_err(|e| Error::io(sink.location(), e))?;

        info!("list {}", path);
        let listing = self
            .store
            .list(path, None)
            .map_err(|e| Error::listing(path, e))?;
        aggregate.fold(&listing);

        for entry in &listing {
            if entry.is_dir {
                debug!("pausing {:?} before {}", self.throttle, entry.path);
                self.throttle.pause();
                self.cancel.check()?;
                self.visit(sink, &entry.path, &entry.name, level + 1, aggregate)?;
            } else {
                sink.write_file(level, &entry.name, entry.size)
                    .map_err(|e| Error::io(sink.location(), e))?;
            }
        }
        Ok(())
    }
}

/// Build the index of `path` into the file `dest`.
///
/// An existing `dest` is never overwritten: the build is skipped and
/// [`BuildOutcome::Reused`] returned. Otherwise the document is written to a
/// temporary file next to `dest` and moved into place once complete, so a
/// failed or cancelled build leaves nothing behind.
pub fn build_index_file<S: RemoteStore + ?Sized>(
    builder: &IndexBuilder<'_, S>,
    path: &str,
    name: &str,
    dest: &Path,
) -> Result<BuildOutcome> {
    if dest.exists() {
        debug!("index {} already exists, skipping build", dest.display());
        return Ok(BuildOutcome::Reused);
    }

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    let (file, temp_path) = temp.into_parts();

    let mut writer = IndexWriter::new(file)
        .map_err(|e| Error::io(temp_path.to_path_buf(), e))?
        .with_location(temp_path.to_path_buf());
    let aggregate = builder.build(&mut writer, path, name)?;
    let file: File = writer
        .finish(&aggregate)
        .map_err(|e| Error::io(temp_path.to_path_buf(), e))?;
    file.sync_all().map_err(|e| Error::io(temp_path.to_path_buf(), e))?;
    drop(file);

    temp_path
        .persist_noclobber(dest)
        .map_err(|e| Error::io(dest, e.error))?;
    info!("wrote index {} ({})", dest.display(), aggregate);
    Ok(BuildOutcome::Created(aggregate))
}
