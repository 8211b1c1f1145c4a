//! Template tree discovery.
//!
//! [`walk_dir`] visits every file below a root directory, reads it, and sorts
//! it into the view or partial map according to [`classify`].
//!
//! ```text
//! templates/
//! ├── base.html            -> partial "base.html"
//! ├── partials/
//! │   └── nav.html         -> partial "partials/nav.html"
//! └── views/
//!     ├── index.html       -> view "views/index.html"
//!     └── about.html       -> view "views/about.html"
//! ```
//!
//! Names are the path relative to the root with `/` separators on every
//! platform. Any read failure aborts the whole walk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::classify::{classify, relative_name, Role};
use crate::error::BuildError;
use crate::filter::ExtensionFilter;

/// Raw template sources discovered in a tree, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Files under the views directory.
    pub views: BTreeMap<String, String>,
    /// Every other accepted file.
    pub partials: BTreeMap<String, String>,
}

impl Sources {
    /// Creates empty source maps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a source under the map chosen by its role.
    pub fn insert(&mut self, role: Role, name: String, content: String) {
        match role {
            Role::View => self.views.insert(name, content),
            Role::Partial => self.partials.insert(name, content),
        };
    }

    /// Total number of files collected.
    pub fn len(&self) -> usize {
        self.views.len() + self.partials.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty() && self.partials.is_empty()
    }
}

/// Walks `root` recursively and collects every accepted file.
///
/// Emptiness of the view map is not checked here; see
/// [`TemplatesBuilder::build`](crate::TemplatesBuilder::build).
pub fn walk_dir(
    root: &Path,
    views_dir: &str,
    filter: &ExtensionFilter,
) -> Result<Sources, BuildError> {
    let mut sources = Sources::new();
    walk_dir_recursive(root, root, views_dir, filter, &mut sources)?;
    debug!(
        root = %root.display(),
        views = sources.views.len(),
        partials = sources.partials.len(),
        "walked template tree"
    );
    Ok(sources)
}

fn walk_dir_recursive(
    current: &Path,
    root: &Path,
    views_dir: &str,
    filter: &ExtensionFilter,
    sources: &mut Sources,
) -> Result<(), BuildError> {
    let entries = fs::read_dir(current).map_err(|e| discovery(current, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| discovery(current, e))?;
        let file_type = entry.file_type().map_err(|e| discovery(&entry.path(), e))?;
        paths.push((entry.path(), file_type));
    }
    paths.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in paths {
        if file_type.is_dir() {
            walk_dir_recursive(&path, root, views_dir, filter, sources)?;
            continue;
        }

        if file_type.is_symlink() {
            // Follow file links; a dangling link fails here.
            let target = fs::metadata(&path).map_err(|e| discovery(&path, e))?;
            if target.is_dir() {
                trace!(path = %path.display(), "skipping symlinked directory");
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }

        if !filter.accepts_path(&path) {
            trace!(path = %path.display(), "skipping file with filtered extension");
            continue;
        }

        let Some(name) = relative_name(root, &path) else {
            return Err(discovery(
                &path,
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "path is not valid UTF-8 relative to the template root",
                ),
            ));
        };
        let content = fs::read_to_string(&path).map_err(|e| discovery(&path, e))?;
        let role = classify(&name, views_dir);
        trace!(%name, ?role, "discovered template");
        sources.insert(role, name, content);
    }

    Ok(())
}

fn discovery(path: &Path, source: io::Error) -> BuildError {
    BuildError::Discovery {
        path: path.to_path_buf(),
        source,
    }
}
