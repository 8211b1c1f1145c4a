//! Error types for building and rendering template collections.
//!
//! Errors are split by phase:
//!
//! - [`BuildError`]: walking the template tree and compiling it. Any build
//!   error is fatal for that build; no partially populated registry is ever
//!   returned.
//! - [`RenderError`]: a single render call. Render errors never affect the
//!   registry or other renders.
//! - [`ConfigError`]: loading a [`LoaderConfig`](crate::LoaderConfig) from YAML.

use std::io;
use std::path::PathBuf;

/// Errors that abort building a [`Templates`](crate::Templates) collection.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The views directory name is not a single path segment.
    #[error("invalid views directory name \"{0}\": expected a single path segment")]
    InvalidViewsDir(String),

    /// Reading the template tree failed (missing root, permission denied,
    /// unreadable file, broken symlink).
    #[error("failed to read template tree at {}: {source}", path.display())]
    Discovery {
        /// Path of the entry that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The walk succeeded but no file was classified as a view.
    #[error("no views were found in {}/{views_dir}", root.display())]
    NoViews {
        /// Root directory that was walked.
        root: PathBuf,
        /// Views directory name in effect.
        views_dir: String,
    },

    /// A view failed to parse.
    #[error("failed to compile view \"{view}\": {source}")]
    ViewSyntax {
        /// Relative path of the view.
        view: String,
        /// Syntax error reported by the template engine.
        #[source]
        source: minijinja::Error,
    },

    /// A partial failed to parse while being attached to a view.
    #[error("failed to compile partial \"{partial}\" for view \"{view}\": {source}")]
    PartialSyntax {
        /// Relative path of the partial.
        partial: String,
        /// View the partial was being attached to.
        view: String,
        /// Syntax error reported by the template engine.
        #[source]
        source: minijinja::Error,
    },
}

impl BuildError {
    /// Returns true for template syntax errors (as opposed to filesystem or
    /// configuration problems).
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            BuildError::ViewSyntax { .. } | BuildError::PartialSyntax { .. }
        )
    }

    /// Name of the template that failed to compile, if any.
    pub fn template_name(&self) -> Option<&str> {
        match self {
            BuildError::ViewSyntax { view, .. } => Some(view),
            BuildError::PartialSyntax { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// A view path that is not in the registry.
///
/// Produced by [`Templates::get`](crate::Templates::get) and held by the
/// returned handle until a render is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template not found: \"{name}\"")]
pub struct NotFoundError {
    /// The view path that was looked up.
    pub name: String,
}

impl NotFoundError {
    /// Creates a not-found error for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors returned by a single render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The handle was obtained for a view that does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The template engine failed while executing (undefined variable in
    /// strict mode, unknown sub-template, failed write to the sink).
    #[error("failed to render \"{template}\" for view \"{view}\": {source}")]
    Execution {
        /// View whose unit was rendered.
        view: String,
        /// Sub-template that was requested.
        template: String,
        /// Error reported by the template engine.
        #[source]
        source: minijinja::Error,
    },

    /// The template engine panicked during execution.
    #[error("rendering \"{template}\" for view \"{view}\" panicked: {message}")]
    Panic {
        /// View whose unit was rendered.
        view: String,
        /// Sub-template that was requested.
        template: String,
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl RenderError {
    /// Returns true if the render failed because the view does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::NotFound(_))
    }
}

/// Errors loading a [`LoaderConfig`](crate::LoaderConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The config could not be parsed.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
