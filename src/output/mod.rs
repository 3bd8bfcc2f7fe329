//! Terminal output
//!
//! - `table` - Aligned text tables with optional bold header and footer
//! - `listing` - `ls`/`search` result tables with totals
//! - `json` - JSON output

mod json;
mod listing;
mod table;

pub use json::write_json;
pub use listing::{
    DIR_SIZE_PLACEHOLDER, Operation, PATH_FOOTER_THRESHOLD, RULE, UNRELIABLE_HASH_MARKER,
    listing_table, render_listing,
};
pub use table::{Align, Table};
