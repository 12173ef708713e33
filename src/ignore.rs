//! Ignore pattern handling for templates.
//! Paths matching these globs (relative to the template root) are left out of
//! the materialized tree. An ignored directory is skipped with all of its contents.

use crate::constants::{CONFIG_FILES, DEFAULT_IGNORE_PATTERNS};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;

/// Builds the ignore set from the default patterns, the rule file names and
/// the template's own patterns.
///
/// # Example
/// ```ignore
/// let set = build_ignore_set(&["**/node_modules".to_string()])?;
/// assert!(set.is_match("web/node_modules"));
/// ```
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    let defaults = DEFAULT_IGNORE_PATTERNS.iter().chain(CONFIG_FILES.iter()).copied();
    for pattern in defaults.chain(patterns.iter().map(String::as_str)) {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            continue;
        }
        debug!("Ignore pattern: {}", pattern);
        builder.add(
            Glob::new(pattern)
                .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))?,
        );
    }

    builder.build().map_err(|e| Error::IgnoreError(e.to_string()))
}
