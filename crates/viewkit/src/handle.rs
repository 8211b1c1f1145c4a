//! Lookup handles returned by [`Templates::get`](crate::Templates::get).
//!
//! A lookup never fails on the spot. The handle carries either the compiled
//! view or the not-found error, and the error surfaces when rendering. This
//! keeps call sites to a single chain:
//!
//! ```rust,ignore
//! templates.get("views/index.html").render("base.html", &mut out, &data)?;
//! ```

use std::io;

use serde::Serialize;

use crate::error::{NotFoundError, RenderError};
use crate::unit::CompiledView;

/// The result of looking up a view.
#[derive(Debug, Clone)]
pub enum Template<'a> {
    /// The view exists.
    Found(&'a CompiledView),
    /// The view does not exist; rendering returns this error.
    NotFound(NotFoundError),
}

impl<'a> Template<'a> {
    /// The view path that was looked up.
    pub fn name(&self) -> &str {
        match self {
            Template::Found(unit) => unit.name(),
            Template::NotFound(err) => &err.name,
        }
    }

    /// Returns true if the view exists.
    pub fn is_found(&self) -> bool {
        matches!(self, Template::Found(_))
    }

    /// The compiled view, if it exists.
    pub fn view(&self) -> Option<&'a CompiledView> {
        match self {
            Template::Found(unit) => Some(*unit),
            Template::NotFound(_) => None,
        }
    }

    /// Renders `template` through the view into `sink`.
    ///
    /// `template` is usually a layout partial such as `"base.html"`, whose
    /// blocks the view fills in; the view's own path renders it alone.
    /// A not-found handle returns [`RenderError::NotFound`] without writing
    /// to `sink`. Output written before an execution error is not retracted;
    /// use [`render_to_string`](Self::render_to_string) to get all or nothing.
    pub fn render<W, S>(&self, template: &str, sink: W, data: S) -> Result<(), RenderError>
    where
        W: io::Write,
        S: Serialize,
    {
        match self {
            Template::Found(unit) => unit.render_to(template, sink, data),
            Template::NotFound(err) => Err(err.clone().into()),
        }
    }

    /// Renders `template` into a buffer and returns it as a string.
    pub fn render_to_string<S: Serialize>(
        &self,
        template: &str,
        data: S,
    ) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.render(template, &mut buf, data)?;
        // Engine output is always valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
