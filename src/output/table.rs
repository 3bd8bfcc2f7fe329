//! Aligned text tables
//!
//! `Table` collects a header, per-column alignment and rows, then writes them
//! as space-separated aligned columns. The header and footer row are drawn
//! bold when the writer supports color.

use std::io::{self, Write};

use termcolor::{ColorSpec, WriteColor};

const COLUMN_GAP: &str = "  ";

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set column alignments; columns without an entry are left-aligned.
    pub fn with_alignment(mut self, align: Vec<Align>) -> Self {
        self.align = align;
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Set the trailing summary row.
    pub fn set_footer(&mut self, row: Vec<String>) {
        self.footer = Some(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn footer(&self) -> Option<&[String]> {
        self.footer.as_deref()
    }

    fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .chain(self.footer.iter())
    }

    /// Display width of every column.
    pub fn widths(&self) -> Vec<usize> {
        let columns = self.all_rows().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in self.all_rows() {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    fn format_row(&self, row: &[String], widths: &[usize]) -> String {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            match self.align.get(i).copied().unwrap_or_default() {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&" ".repeat(pad));
                }
                Align::Right => {
                    line.push_str(&" ".repeat(pad));
                    line.push_str(cell);
                }
            }
        }
        line.trim_end().to_string()
    }

    /// Render the table without color into a string.
    pub fn to_plain_string(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        for row in self.all_rows() {
            out.push_str(&self.format_row(row, &widths));
            out.push('\n');
        }
        out
    }

    pub fn render<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.widths();
        let mut bold = ColorSpec::new();
        bold.set_bold(true);

        out.set_color(&bold)?;
        writeln!(out, "{}", self.format_row(&self.header, &widths))?;
        out.reset()?;

        for row in &self.rows {
            writeln!(out, "{}", self.format_row(row, &widths))?;
        }

        if let Some(footer) = &self.footer {
            out.set_color(&bold)?;
            writeln!(out, "{}", self.format_row(footer, &widths))?;
            out.reset()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn sample() -> Table {
        let mut table = Table::new(["#", "size", "name"]).with_alignment(vec![
            Align::Left,
            Align::Right,
            Align::Left,
        ]);
        table.push_row(vec!["0".into(), "500B".into(), "note.txt".into()]);
        table.push_row(vec!["1".into(), "12.00KB".into(), "photo.jpg".into()]);
        table
    }

    #[test]
    fn test_widths_cover_all_rows() {
        let mut table = sample();
        table.set_footer(vec!["".into(), "total: 12.49KB".into()]);
        assert_eq!(table.widths(), vec![1, 14, 9]);
    }

    #[test]
    fn test_alignment() {
        let rendered = sample().to_plain_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "#     size  name");
        assert_eq!(lines[1], "0     500B  note.txt");
        assert_eq!(lines[2], "1  12.00KB  photo.jpg");
    }

    #[test]
    fn test_render_matches_plain_string() {
        let table = sample();
        let mut out = NoColor::new(Vec::new());
        table.render(&mut out).unwrap();
        let rendered = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(rendered, table.to_plain_string());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(vec!["x".into()]);
        assert_eq!(table.to_plain_string().lines().nth(1), Some("x"));
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let mut table = Table::new(["name", "size"]);
        table.push_row(vec!["文件".into(), "1B".into()]);
        assert_eq!(table.widths(), vec![4, 4]);
    }
}
