//! Helpers for `/`-separated remote paths

use crate::entry::PATH_SEPARATOR;

/// Join a child name onto a remote directory path.
pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with(PATH_SEPARATOR) {
        format!("{}{}", dir, name)
    } else {
        format!("{}{}{}", dir, PATH_SEPARATOR, name)
    }
}

/// Make `path` absolute against `cwd` and collapse `.`, `..` and repeated
/// separators. The result always starts with `/` and never ends with one
/// (except for the root itself).
pub fn absolutize(cwd: &str, path: &str) -> String {
    let joined = if path.starts_with(PATH_SEPARATOR) {
        path.to_string()
    } else {
        join(cwd, path)
    };
    normalize(&joined)
}

/// Collapse `.`, `..` and repeated separators of an absolute path.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(PATH_SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("{}{}", PATH_SEPARATOR, parts.join(PATH_SEPARATOR))
}

/// Split an absolute normalized path into its segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

/// Last segment of a path, or `None` for the root.
pub fn file_name(path: &str) -> Option<&str> {
    segments(path).last()
}
