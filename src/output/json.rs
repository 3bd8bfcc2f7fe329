//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;

/// Write any serializable value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, EntryList};

    #[test]
    fn test_entry_list_serializes_as_array() {
        let list = EntryList::new(vec![Entry::file("/docs/a.txt", 1024)]);
        let mut out = Vec::new();
        write_json(&mut out, &list).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let items = value.as_array().expect("expected a JSON array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "a.txt");
        assert_eq!(items[0]["size"], 1024);
        assert_eq!(items[0]["is_dir"], false);
        assert!(items[0].get("block_list").is_none());
    }
}
