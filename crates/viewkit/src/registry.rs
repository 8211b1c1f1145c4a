//! The built template collection.
//!
//! [`Templates`] maps each view path to its [`CompiledView`]. It is built once
//! by [`TemplatesBuilder::build`] (or [`Templates::load`]) and is read-only
//! afterwards, so it can be shared across threads behind an `Arc` and rendered
//! from concurrently without locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use viewkit::Templates;
//!
//! let templates = Templates::builder()
//!     .extensions([".html"])
//!     .build("templates")?;
//!
//! let mut page = Vec::new();
//! templates
//!     .get("views/index.html")
//!     .render("base.html", &mut page, &data)?;
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::classify::is_valid_views_dir;
use crate::compile::compile;
use crate::config::LoaderConfig;
use crate::error::{BuildError, NotFoundError, RenderError};
use crate::handle::Template;
use crate::unit::CompiledView;
use crate::walk::walk_dir;

/// Configures and builds a [`Templates`] collection.
///
/// All settings apply to the build only; a built collection cannot be
/// reconfigured.
#[derive(Debug, Clone, Default)]
pub struct TemplatesBuilder {
    config: LoaderConfig,
}

impl TemplatesBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing config.
    pub fn from_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Sets the name of the views subdirectory (default `"views"`).
    pub fn views_dir(mut self, name: impl Into<String>) -> Self {
        self.config.views_dir = name.into();
        self
    }

    /// Restricts the build to files with these extensions.
    ///
    /// An empty list, the default, accepts every file.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Makes undefined variables a render error.
    pub fn strict_undefined(mut self, strict: bool) -> Self {
        self.config.strict_undefined = strict;
        self
    }

    /// Enables the engine's `trim_blocks` option.
    pub fn trim_blocks(mut self, yes: bool) -> Self {
        self.config.trim_blocks = yes;
        self
    }

    /// Enables the engine's `lstrip_blocks` option.
    pub fn lstrip_blocks(mut self, yes: bool) -> Self {
        self.config.lstrip_blocks = yes;
        self
    }

    /// Keeps the trailing newline of template files.
    pub fn keep_trailing_newline(mut self, yes: bool) -> Self {
        self.config.keep_trailing_newline = yes;
        self
    }

    /// The config this builder will apply.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Walks `root`, compiles every view with every partial, and returns the
    /// collection.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidViewsDir`] if the views dir is not one segment
    /// - [`BuildError::Discovery`] if any part of the tree cannot be read
    /// - [`BuildError::NoViews`] if no file was classified as a view
    /// - [`BuildError::ViewSyntax`] / [`BuildError::PartialSyntax`] on the
    ///   first template that fails to parse
    pub fn build<P: AsRef<Path>>(self, root: P) -> Result<Templates, BuildError> {
        let root = root.as_ref().to_path_buf();
        let config = self.config;

        if !is_valid_views_dir(&config.views_dir) {
            return Err(BuildError::InvalidViewsDir(config.views_dir));
        }

        let sources = walk_dir(&root, &config.views_dir, &config.extension_filter())?;
        if sources.views.is_empty() {
            return Err(BuildError::NoViews {
                root,
                views_dir: config.views_dir,
            });
        }

        let views = compile(&sources, &config)?;
        let partials = sources.partials.into_keys().collect();
        debug!(root = %root.display(), views = views.len(), "built template collection");

        Ok(Templates {
            root,
            config,
            views,
            partials,
        })
    }
}

/// A read-only collection of compiled views.
#[derive(Debug)]
pub struct Templates {
    root: PathBuf,
    config: LoaderConfig,
    views: BTreeMap<String, CompiledView>,
    partials: Vec<String>,
}

impl Templates {
    /// Starts configuring a build.
    pub fn builder() -> TemplatesBuilder {
        TemplatesBuilder::new()
    }

    /// Builds a collection from `root` with default settings.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, BuildError> {
        TemplatesBuilder::new().build(root)
    }

    /// Builds a fresh collection from the same root and config.
    ///
    /// `self` is left untouched; swapping the result in is up to the caller
    /// (see [`SharedTemplates`](crate::SharedTemplates)).
    pub fn rebuild(&self) -> Result<Self, BuildError> {
        TemplatesBuilder::from_config(self.config.clone()).build(&self.root)
    }

    /// Looks up a view.
    ///
    /// Never fails here: an unknown name yields a handle whose
    /// [`render`](Template::render) returns [`RenderError::NotFound`].
    pub fn get(&self, name: &str) -> Template<'_> {
        match self.views.get(name) {
            Some(unit) => Template::Found(unit),
            None => Template::NotFound(NotFoundError::new(name)),
        }
    }

    /// Looks up a view, returning `None` if it does not exist.
    pub fn view(&self, name: &str) -> Option<&CompiledView> {
        self.views.get(name)
    }

    /// Looks up `view` and renders `template` through it.
    pub fn render<W, S>(
        &self,
        view: &str,
        template: &str,
        sink: W,
        data: S,
    ) -> Result<(), RenderError>
    where
        W: io::Write,
        S: Serialize,
    {
        self.get(view).render(template, sink, data)
    }

    /// Returns true if `name` is a view in this collection.
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if there are no views. A successful build never
    /// produces an empty collection.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// View paths, sorted.
    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Partial paths, sorted.
    pub fn partial_names(&self) -> impl Iterator<Item = &str> {
        self.partials.iter().map(String::as_str)
    }

    /// Root directory the collection was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config the collection was built with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
