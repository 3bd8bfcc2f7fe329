//! Table rendering for `ls` and `search` results

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::entry::{Entry, EntryList, PATH_SEPARATOR};
use crate::format::{format_size, format_time};
use crate::stats::Aggregate;

use super::table::{Align, Table};

/// Size cell shown for directories.
pub const DIR_SIZE_PLACEHOLDER: &str = "-";

/// Prefix for hashes of multi-block files, whose whole-file hash may be wrong.
pub const UNRELIABLE_HASH_MARKER: &str = "(possibly incorrect)";

/// Listings with at least this many entries repeat the path below the table.
pub const PATH_FOOTER_THRESHOLD: u64 = 50;

/// Rule printed after every listing.
pub const RULE: &str = "----";

/// Which command produced the listing; decides the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Directory listing: show leaf names
    Listing,
    /// Search results: show full paths
    Search,
}

impl Operation {
    pub fn column_title(self) -> &'static str {
        match self {
            Operation::Listing => "name",
            Operation::Search => "path",
        }
    }

    /// Value of the last column for an entry.
    ///
    /// Directories always show their leaf name with a trailing `/`; only file
    /// rows switch to the full path in search results.
    pub fn display_value(self, entry: &Entry) -> String {
        if entry.is_dir {
            return format!("{}{}", entry.name, PATH_SEPARATOR);
        }
        match self {
            Operation::Listing => entry.name.clone(),
            Operation::Search => entry.path.clone(),
        }
    }
}

fn size_cell(entry: &Entry) -> String {
    if entry.is_dir {
        DIR_SIZE_PLACEHOLDER.to_string()
    } else {
        format_size(entry.size)
    }
}

fn hash_cell(entry: &Entry) -> String {
    if !entry.is_dir && entry.hash_may_be_incorrect() {
        format!("{}{}", UNRELIABLE_HASH_MARKER, entry.content_hash)
    } else {
        entry.content_hash.clone()
    }
}

/// Build the table for a listing along with the totals of that listing alone.
pub fn listing_table(op: Operation, show_totals: bool, entries: &EntryList) -> (Table, Aggregate) {
    let totals = Aggregate::of(entries);
    let total_label = format!("total: {}", format_size(totals.total_size));

    let table = if show_totals {
        let mut table = Table::new([
            "#",
            "fs_id",
            "app_id",
            "size",
            "created",
            "modified",
            "md5",
            op.column_title(),
        ])
        .with_alignment(vec![
            Align::Left,
            Align::Right,
            Align::Right,
            Align::Left,
            Align::Left,
            Align::Left,
            Align::Left,
            Align::Left,
        ]);
        for (i, entry) in entries.iter().enumerate() {
            table.push_row(vec![
                i.to_string(),
                entry.fs_id.to_string(),
                entry.app_id.to_string(),
                size_cell(entry),
                format_time(&entry.created),
                format_time(&entry.modified),
                hash_cell(entry),
                op.display_value(entry),
            ]);
        }
        table.set_footer(vec![
            String::new(),
            String::new(),
            String::new(),
            total_label,
            String::new(),
            String::new(),
            String::new(),
            totals.counts_label(),
        ]);
        table
    } else {
        let mut table = Table::new(["#", "size", "modified", op.column_title()]).with_alignment(
            vec![Align::Left, Align::Right, Align::Left, Align::Left],
        );
        for (i, entry) in entries.iter().enumerate() {
            table.push_row(vec![
                i.to_string(),
                size_cell(entry),
                format_time(&entry.modified),
                op.display_value(entry),
            ]);
        }
        table.set_footer(vec![
            String::new(),
            total_label,
            String::new(),
            totals.counts_label(),
        ]);
        table
    };

    (table, totals)
}

/// Render a listing as a table, followed by the path footer for long
/// listings and the closing rule. Returns the totals of this listing.
pub fn render_listing<W: WriteColor>(
    out: &mut W,
    op: Operation,
    show_totals: bool,
    path: &str,
    entries: &EntryList,
) -> io::Result<Aggregate> {
    let (table, totals) = listing_table(op, show_totals, entries);
    table.render(out)?;

    if totals.entries() >= PATH_FOOTER_THRESHOLD {
        writeln!(out)?;
        writeln!(out, "current directory: {}", path)?;
    }
    writeln!(out, "{}", RULE)?;
    Ok(totals)
}
