//! View/partial classification of discovered files.
//!
//! Every file below the template root is either a view or a partial:
//!
//! | Relative path | Views dir | Role |
//! |---------------|-----------|------|
//! | `views/index.html` | `views` | View |
//! | `views/blog/post.html` | `views` | View |
//! | `base.html` | `views` | Partial |
//! | `viewsExtra/x.html` | `views` | Partial |
//! | `partials/views/x.html` | `views` | Partial |
//!
//! The views directory is matched as a whole leading path segment, never as a
//! substring.

use std::path::{Component, Path};

/// Role of a template file within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A page-level entry point, compiled into its own unit.
    View,
    /// A shared fragment attached to every view.
    Partial,
}

/// Classifies a `/`-separated path relative to the template root.
///
/// A path is a view iff its first segment equals `views_dir` and at least one
/// more non-empty segment follows it.
pub fn classify(relative: &str, views_dir: &str) -> Role {
    match relative.split_once('/') {
        Some((first, rest)) if first == views_dir && !rest.is_empty() => Role::View,
        _ => Role::Partial,
    }
}

/// Computes the `/`-separated name of `path` relative to `root`.
///
/// Returns `None` when `path` is not below `root`, has no normal
/// components left after stripping it, or has a segment that is not valid
/// UTF-8.
pub fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            segments.push(segment.to_str()?);
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Checks that a views directory name is a single usable path segment.
pub fn is_valid_views_dir(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
