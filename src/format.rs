//! Human-readable formatting for sizes and timestamps

use chrono::{DateTime, Local, Utc};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;
const PB: u64 = TB * 1024;
const EB: u64 = PB * 1024;

/// Format a size in bytes using binary multiples with two decimals.
///
/// Sizes below one kilobyte are printed as whole bytes (`500B`), everything
/// else as e.g. `1.00KB`, `2.50MB`.
pub fn format_size(bytes: u64) -> String {
    let (unit, divisor) = if bytes >= EB {
        ("EB", EB)
    } else if bytes >= PB {
        ("PB", PB)
    } else if bytes >= TB {
        ("TB", TB)
    } else if bytes >= GB {
        ("GB", GB)
    } else if bytes >= MB {
        ("MB", MB)
    } else if bytes >= KB {
        ("KB", KB)
    } else {
        return format!("{}B", bytes);
    };

    format!("{:.2}{}", bytes as f64 / divisor as f64, unit)
}

/// Format a timestamp in local time, e.g. `2024-03-01 14:05:09`.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
