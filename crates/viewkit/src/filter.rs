//! Extension allow-list applied while walking the template tree.

use std::collections::BTreeSet;
use std::path::Path;

/// An optional allow-list of file extensions.
///
/// Extensions are stored dot-prefixed (`".html"`). An empty filter accepts
/// every file.
///
/// ```rust
/// use viewkit::ExtensionFilter;
///
/// let any = ExtensionFilter::default();
/// assert!(any.accepts(".txt"));
///
/// let html = ExtensionFilter::new([".html", "htm"]);
/// assert!(html.accepts(".html"));
/// assert!(html.accepts(".htm"));
/// assert!(!html.accepts(".txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Creates a filter from a list of extensions.
    ///
    /// Entries without a leading dot get one. Empty entries are ignored.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        Self { allowed }
    }

    /// Returns true if no extensions are configured.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Returns true if `ext` (dot-prefixed, or `""`) passes the filter.
    pub fn accepts(&self, ext: &str) -> bool {
        self.allowed.is_empty() || self.allowed.contains(ext)
    }

    /// Returns true if the file at `path` passes the filter.
    pub fn accepts_path(&self, path: &Path) -> bool {
        self.accepts(&extension_of(path))
    }

    /// Iterates the configured extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

/// Returns the dot-prefixed extension of the last path component, or `""`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    if ext.is_empty() || ext == "." {
        None
    } else if ext.starts_with('.') {
        Some(ext.to_string())
    } else {
        Some(format!(".{ext}"))
    }
}
