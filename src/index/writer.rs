//! Line-oriented writer for index documents
//!
//! Document layout:
//!
//! ```text
//! directories: 1, files: 2, size: 3.00KB      <- placeholder, rewritten last
//! |—docs
//! |  |—sub
//! |  |  |  b.txt (2.00KB)
//! |  |  a.txt (1.00KB)
//! ```
//!
//! The first line is reserved as a run of spaces and overwritten in place once
//! the totals are known, so the sink must be seekable.

use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::format::format_size;
use crate::stats::Aggregate;

/// Width of the reserved header line (excluding the newline).
pub const HEADER_WIDTH: usize = 90;

/// Indent unit repeated once per level.
pub const INDENT: &str = "|  ";

/// Marker placed before a directory name.
pub const BRANCH: &str = "|—";

/// Location reported for sinks that were not given one.
const UNNAMED_SINK: &str = "<index>";

/// Writes index lines into a seekable sink.
pub struct IndexWriter<W: Write + Seek> {
    inner: W,
    location: PathBuf,
    lines: usize,
}

impl<W: Write + Seek> IndexWriter<W> {
    /// Start a document by writing the reserved header line.
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{}", " ".repeat(HEADER_WIDTH))?;
        Ok(Self {
            inner,
            location: PathBuf::from(UNNAMED_SINK),
            lines: 1,
        })
    }

    /// Name the file behind the sink, used when reporting write errors.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory line: `level - 1` indents, the branch marker, then the name.
    pub fn write_dir(&mut self, level: usize, name: &str) -> io::Result<()> {
        writeln!(
            self.inner,
            "{}{}{}",
            INDENT.repeat(level.saturating_sub(1)),
            BRANCH,
            name
        )?;
        self.lines += 1;
        Ok(())
    }

    /// File line for a file inside a directory at `level`.
    pub fn write_file(&mut self, level: usize, name: &str, size: u64) -> io::Result<()> {
        writeln!(
            self.inner,
            "{}{} ({})",
            INDENT.repeat(level + 1),
            name,
            format_size(size)
        )?;
        self.lines += 1;
        Ok(())
    }

    /// Lines written so far, header included.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Overwrite the header with the summary and hand back the sink.
    pub fn finish(mut self, aggregate: &Aggregate) -> io::Result<W> {
        let summary = aggregate.summary();
        debug_assert!(summary.len() <= HEADER_WIDTH);

        self.inner.seek(SeekFrom::Start(0))?;
        write!(self.inner, "{:<width$}", summary, width = HEADER_WIDTH)?;
        self.inner.seek(SeekFrom::End(0))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_is_reserved_then_rewritten() {
        let mut writer = IndexWriter::new(Cursor::new(Vec::new())).unwrap();
        writer.write_dir(1, "docs").unwrap();
        writer.write_file(1, "a.txt", 1024).unwrap();
        assert_eq!(writer.lines(), 3);

        let mut aggregate = Aggregate::new();
        aggregate.record_file(1024);
        let text = String::from_utf8(writer.finish(&aggregate).unwrap().into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim_end(), "directories: 0, files: 1, size: 1.00KB");
        assert_eq!(lines[0].len(), HEADER_WIDTH);
        assert_eq!(lines[1], "|—docs");
        assert_eq!(lines[2], "|  |  a.txt (1.00KB)");
    }

    #[test]
    fn test_indentation_by_level() {
        let mut writer = IndexWriter::new(Cursor::new(Vec::new())).unwrap();
        writer.write_dir(3, "deep").unwrap();
        writer.write_file(3, "x", 1).unwrap();
        let text = String::from_utf8(writer.finish(&Aggregate::new()).unwrap().into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "|  |  |—deep");
        assert_eq!(lines[2], "|  |  |  |  x (1B)");
    }

    #[test]
    fn test_largest_summary_fits_header() {
        let aggregate = Aggregate {
            files: u64::MAX,
            directories: u64::MAX,
            total_size: u64::MAX,
        };
        assert!(aggregate.summary().len() <= HEADER_WIDTH);
    }
}
