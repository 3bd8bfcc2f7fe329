//! Shell-pattern resolution of remote paths
//!
//! A user-supplied path may be relative to the working directory and may
//! contain glob metacharacters in any segment (`/docs/*2024*/report?.pdf`).
//! Segments with metacharacters are expanded against directory listings;
//! plain segments are taken as-is and only checked later by the listing
//! itself. A command needs exactly one resulting path.

use glob::{MatchOptions, Pattern};
use log::debug;

use crate::error::{Error, ResolveFailure, Result};
use crate::paths;
use crate::store::RemoteStore;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Check whether a path segment contains glob metacharacters.
pub fn has_glob_chars(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Expand a pattern into every remote path it matches.
pub fn match_paths<S: RemoteStore + ?Sized>(
    store: &S,
    cwd: &str,
    pattern: &str,
) -> Result<Vec<String>> {
    let absolute = paths::absolutize(cwd, pattern);
    let segments: Vec<&str> = paths::segments(&absolute).collect();

    let mut candidates = vec!["/".to_string()];
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i == segments.len() - 1;

        if !has_glob_chars(segment) {
            for candidate in &mut candidates {
                *candidate = paths::join(candidate, segment);
            }
            continue;
        }

        let glob = Pattern::new(segment).map_err(|e| {
            Error::resolution(pattern, ResolveFailure::InvalidPattern(e.to_string()))
        })?;

        let mut next = Vec::new();
        for candidate in &candidates {
            let listing = match store.list(candidate, None) {
                Ok(listing) => listing,
                // A non-matching literal prefix simply yields no candidates
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(Error::listing(candidate, e)),
            };
            next.extend(
                listing
                    .iter()
                    .filter(|e| is_last || e.is_dir)
                    .filter(|e| glob.matches_with(&e.name, MATCH_OPTIONS))
                    .map(|e| e.path.clone()),
            );
        }
        candidates = next;
    }

    Ok(candidates)
}

/// Resolve a pattern to exactly one remote path.
pub fn resolve_path<S: RemoteStore + ?Sized>(store: &S, cwd: &str, pattern: &str) -> Result<String> {
    let mut matches = match_paths(store, cwd, pattern)?;
    match matches.len() {
        0 => Err(Error::resolution(pattern, ResolveFailure::NoMatch)),
        1 => {
            let resolved = matches.remove(0);
            debug!("resolved '{}' to {}", pattern, resolved);
            Ok(resolved)
        }
        n => Err(Error::resolution(pattern, ResolveFailure::Ambiguous(n))),
    }
}
