//! # viewkit - View and Partial Template Collections
//!
//! `viewkit` loads a directory of [MiniJinja](minijinja) templates into a
//! collection of renderable views. Files under the views directory become
//! views; every other file is a partial that each view can use.
//!
//! ## Directory Layout
//!
//! ```text
//! templates/
//! ├── base.html
//! ├── partials/
//! │   ├── css.html
//! │   └── nav.html
//! └── views/
//!     ├── index.html
//!     └── about.html
//! ```
//!
//! Templates are named by their path relative to the root: the views above
//! are `"views/index.html"` and `"views/about.html"`, the partials
//! `"base.html"`, `"partials/css.html"` and `"partials/nav.html"`.
//!
//! ## Core Concepts
//!
//! - [`Templates`]: the built, read-only collection of views
//! - [`TemplatesBuilder`]: build settings (views dir, extensions, engine options)
//! - [`Template`]: lookup handle; a missing view surfaces when rendering
//! - [`CompiledView`]: one view compiled together with every partial
//! - [`SharedTemplates`]: swap in a rebuilt collection while rendering continues
//!
//! ## Layouts and Blocks
//!
//! A view fills in blocks; a layout partial decides where they go. Rendering
//! a partial's name through a view renders that partial with the view's
//! blocks:
//!
//! ```rust
//! use std::fs;
//! use viewkit::Templates;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::create_dir(dir.path().join("views")).unwrap();
//! fs::write(
//!     dir.path().join("base.html"),
//!     "<h1>{{ title }}</h1>{% block body %}{% endblock %}",
//! ).unwrap();
//! fs::write(
//!     dir.path().join("views/index.html"),
//!     "{% block body %}<p>Hello</p>{% endblock %}",
//! ).unwrap();
//!
//! let templates = Templates::load(dir.path()).unwrap();
//!
//! let mut page = Vec::new();
//! templates
//!     .get("views/index.html")
//!     .render("base.html", &mut page, serde_json::json!({ "title": "Home" }))
//!     .unwrap();
//! assert_eq!(page, b"<h1>Home</h1><p>Hello</p>");
//!
//! let missing = templates.get("views/missing.html");
//! assert!(missing.render("base.html", &mut Vec::new(), ()).unwrap_err().is_not_found());
//! ```
//!
//! ## Build Once
//!
//! The whole tree is read and compiled by one call. Any unreadable file, a
//! tree without views, or a template syntax error fails the build with a
//! [`BuildError`]; no partial collection is ever returned. After the build
//! the collection is immutable and can be rendered from many threads at once.

mod classify;
mod compile;
mod config;
mod error;
mod filter;
mod handle;
mod registry;
mod shared;
mod unit;
mod walk;

pub use classify::{classify, relative_name, Role};
pub use compile::compile;
pub use config::{LoaderConfig, DEFAULT_VIEWS_DIR};
pub use error::{BuildError, ConfigError, NotFoundError, RenderError};
pub use filter::{extension_of, ExtensionFilter};
pub use handle::Template;
pub use registry::{Templates, TemplatesBuilder};
pub use shared::SharedTemplates;
pub use unit::CompiledView;
pub use walk::{walk_dir, Sources};
