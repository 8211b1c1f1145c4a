//! Compiled views.
//!
//! A [`CompiledView`] owns one template environment holding a single view
//! and every partial of the collection. Environments are never shared
//! between views, so template names in one view cannot leak into another.
//!
//! # Layout composition
//!
//! Views usually contribute `{% block %}` definitions that a layout partial
//! renders. For every attached partial the unit registers a composition of
//! the partial with the view, equivalent to the child template
//!
//! ```text
//! {% extends "<partial>" %}<view source>
//! ```
//!
//! Rendering `"base.html"` through `views/index.html` therefore renders
//! `base.html` with the blocks of `views/index.html` filled in. Rendering the
//! view's own name renders the view on its own, and rendering a block name
//! such as `"body"` renders just that block of the view.
//!
//! A view that extends a layout itself (`{% extends "base.html" %}`) already
//! picked its layout. Its partials are attached without a composition and
//! render as plain templates.

use std::collections::BTreeMap;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use minijinja::{Environment, ErrorKind};
use serde::Serialize;

use crate::config::LoaderConfig;
use crate::error::RenderError;

/// One view compiled together with every partial.
pub struct CompiledView {
    name: String,
    source: String,
    env: Environment<'static>,
    extends: bool,
    /// partial name -> template rendered for it
    layouts: BTreeMap<String, String>,
}

impl std::fmt::Debug for CompiledView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledView")
            .field("name", &self.name)
            .field("partials", &self.layouts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CompiledView {
    /// Parses a view as a standalone template named `name`.
    pub(crate) fn new(
        name: &str,
        source: &str,
        config: &LoaderConfig,
    ) -> Result<Self, minijinja::Error> {
        let mut env = config.environment();
        env.add_template_owned(name.to_string(), source.to_string())?;
        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            env,
            extends: extends_layout(source),
            layouts: BTreeMap::new(),
        })
    }

    /// Attaches a partial under its own name and registers its composition
    /// with this view.
    pub(crate) fn attach(&mut self, partial: &str, source: &str) -> Result<(), minijinja::Error> {
        self.env
            .add_template_owned(partial.to_string(), source.to_string())?;

        if self.extends {
            self.layouts.insert(partial.to_string(), partial.to_string());
            return Ok(());
        }

        let composed = composed_name(partial, &self.name);
        let composed_source = format!("{{% extends {} %}}{}", quote(partial), self.source);
        self.env.add_template_owned(composed.clone(), composed_source)?;
        self.layouts.insert(partial.to_string(), composed);
        Ok(())
    }

    /// Relative path of the view.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the partials attached to this view, sorted.
    pub fn partial_names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    /// Returns true if `template` is the view itself or an attached partial.
    ///
    /// Block names are resolved when rendering.
    pub fn has_template(&self, template: &str) -> bool {
        template == self.name || self.layouts.contains_key(template)
    }

    /// Executes `template` with `data` and streams the output to `sink`.
    ///
    /// `template` is the view's own name, the name of a partial, or the name
    /// of a block defined by the view. Output written before a failure stays
    /// in `sink`.
    pub fn render_to<W, S>(&self, template: &str, mut sink: W, data: S) -> Result<(), RenderError>
    where
        W: io::Write,
        S: Serialize,
    {
        let target = if template == self.name {
            Some(template)
        } else {
            self.layouts.get(template).map(String::as_str)
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(), minijinja::Error> {
            match target {
                Some(target) => {
                    let tmpl = self.env.get_template(target)?;
                    tmpl.render_to_write(data, &mut sink)?;
                }
                None => self.render_block(template, &mut sink, data)?,
            }
            Ok(())
        }));

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(RenderError::Execution {
                view: self.name.clone(),
                template: template.to_string(),
                source,
            }),
            Err(payload) => Err(RenderError::Panic {
                view: self.name.clone(),
                template: template.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Renders one `{% block %}` of the view with `data`.
    fn render_block<W, S>(&self, block: &str, sink: W, data: S) -> Result<(), minijinja::Error>
    where
        W: io::Write,
        S: Serialize,
    {
        let tmpl = self.env.get_template(&self.name)?;
        let mut state = tmpl.eval_to_state(data)?;
        state
            .render_block_to_write(block, sink)
            .map(|_| ())
            .map_err(|err| {
                if err.kind() == ErrorKind::UnknownBlock {
                    minijinja::Error::new(
                        ErrorKind::TemplateNotFound,
                        format!("template {block:?} does not exist"),
                    )
                } else {
                    err
                }
            })
    }
}

/// Returns true if `source` contains an `{% extends %}` tag.
fn extends_layout(source: &str) -> bool {
    source.match_indices("{%").any(|(start, _)| {
        source[start + 2..]
            .trim_start_matches(['-', '+'])
            .trim_start()
            .strip_prefix("extends")
            .is_some_and(|rest| {
                rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '\'')
            })
    })
}

/// Name of the composition of `partial` with `view`.
///
/// Relative paths produced by the walker never contain `//`, so these names
/// cannot collide with discovered files. The name ends with the view's name,
/// which keeps auto-escaping keyed on the view's extension.
fn composed_name(partial: &str, view: &str) -> String {
    format!("{partial}//{view}")
}

/// Quotes a template name as a string literal.
fn quote(name: &str) -> String {
    serde_json::Value::from(name).to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(view: &str, partials: &[(&str, &str)]) -> CompiledView {
        let mut unit = CompiledView::new("views/index.html", view, &LoaderConfig::default()).unwrap();
        for (name, source) in partials {
            unit.attach(name, source).unwrap();
        }
        unit
    }

    fn render(unit: &CompiledView, template: &str) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        unit.render_to(template, &mut buf, ())?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_layout_renders_view_blocks() {
        let unit = compile(
            "{% block body %}Hello{% endblock %}",
            &[("base.html", "<main>{% block body %}{% endblock %}</main>")],
        );
        assert_eq!(render(&unit, "base.html").unwrap(), "<main>Hello</main>");
    }

    #[test]
    fn test_layout_keeps_defaults_for_missing_blocks() {
        let unit = compile(
            "{% block body %}Hello{% endblock %}",
            &[(
                "base.html",
                "{% block body %}{% endblock %}|{% block footer %}default{% endblock %}",
            )],
        );
        assert_eq!(render(&unit, "base.html").unwrap(), "Hello|default");
    }

    #[test]
    fn test_view_renders_standalone() {
        let unit = compile("top {% block body %}Hello{% endblock %}", &[]);
        assert_eq!(render(&unit, "views/index.html").unwrap(), "top Hello");
    }

    #[test]
    fn test_view_blocks_can_include_partials() {
        let unit = compile(
            r#"{% block nav %}{% include "partials/nav.html" %}{% endblock %}"#,
            &[
                ("base.html", "[{% block nav %}{% endblock %}]"),
                ("partials/nav.html", "NAV"),
            ],
        );
        assert_eq!(render(&unit, "base.html").unwrap(), "[NAV]");
        assert_eq!(render(&unit, "partials/nav.html").unwrap(), "NAV");
    }

    #[test]
    fn test_unknown_template_is_execution_error() {
        let unit = compile("x", &[("base.html", "b")]);
        let err = render(&unit, "layout.html").unwrap_err();
        match err {
            RenderError::Execution { view, template, source } => {
                assert_eq!(view, "views/index.html");
                assert_eq!(template, "layout.html");
                assert_eq!(source.kind(), minijinja::ErrorKind::TemplateNotFound);
            }
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[test]
    fn test_renders_named_block() {
        let unit = compile(
            "top {% block head %}H{% endblock %}{% block body %}Hello {{ 1 + 1 }}{% endblock %}",
            &[("base.html", "b")],
        );
        assert_eq!(render(&unit, "body").unwrap(), "Hello 2");
        assert_eq!(render(&unit, "head").unwrap(), "H");
    }

    #[test]
    fn test_extending_view_renders_every_partial() {
        let unit = compile(
            r#"{% extends "base.html" %}{% block body %}Hello{% endblock %}"#,
            &[
                ("base.html", "[{% block body %}{% endblock %}]"),
                ("partials/nav.html", "NAV"),
            ],
        );
        assert_eq!(render(&unit, "views/index.html").unwrap(), "[Hello]");
        assert_eq!(render(&unit, "partials/nav.html").unwrap(), "NAV");
        assert_eq!(render(&unit, "base.html").unwrap(), "[]");
        assert_eq!(render(&unit, "body").unwrap(), "Hello");
    }

    #[test]
    fn test_extends_layout() {
        assert!(extends_layout(r#"{% extends "base.html" %}"#));
        assert!(extends_layout("{%- extends 'base.html' -%}"));
        assert!(extends_layout("x\n{%extends layout %}"));
        assert!(!extends_layout("{% block body %}extends{% endblock %}"));
        assert!(!extends_layout("{% extendsfoo %}"));
        assert!(!extends_layout("{{ extends }}"));
    }

    #[test]
    fn test_panic_while_rendering_is_caught() {
        struct Exploding;

        impl Serialize for Exploding {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                panic!("exploding data")
            }
        }

        let unit = compile("{% block body %}{% endblock %}", &[("base.html", "b")]);
        let mut buf = Vec::new();
        let err = unit.render_to("base.html", &mut buf, Exploding).unwrap_err();
        match err {
            RenderError::Panic {
                view,
                template,
                message,
            } => {
                assert_eq!(view, "views/index.html");
                assert_eq!(template, "base.html");
                assert_eq!(message, "exploding data");
            }
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_render_keeps_written_output() {
        let config = LoaderConfig {
            strict_undefined: true,
            ..LoaderConfig::default()
        };
        let mut unit =
            CompiledView::new("views/index.html", "{% block body %}Hello{% endblock %}", &config)
                .unwrap();
        unit.attach("base.html", "A{% block body %}{% endblock %}{{ missing }}")
            .unwrap();

        let mut buf = Vec::new();
        let err = unit.render_to("base.html", &mut buf, ()).unwrap_err();
        assert!(matches!(err, RenderError::Execution { .. }));
        assert_eq!(String::from_utf8(buf).unwrap(), "AHello");
    }

    #[test]
    fn test_partial_syntax_error_on_attach() {
        let mut unit = CompiledView::new("views/index.html", "x", &LoaderConfig::default()).unwrap();
        assert!(unit.attach("broken.html", "{% if %}").is_err());
    }

    #[test]
    fn test_has_template() {
        let unit = compile("x", &[("base.html", "b")]);
        assert!(unit.has_template("views/index.html"));
        assert!(unit.has_template("base.html"));
        assert!(!unit.has_template("other.html"));
        assert_eq!(unit.partial_names().collect::<Vec<_>>(), vec!["base.html"]);
    }

    #[test]
    fn test_html_views_are_escaped() {
        let unit = compile(
            "{% block body %}{{ text }}{% endblock %}",
            &[("base.html", "{% block body %}{% endblock %}")],
        );
        let mut buf = Vec::new();
        unit.render_to("base.html", &mut buf, serde_json::json!({ "text": "<b>" }))
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "&lt;b&gt;");
    }

    #[test]
    fn test_quote_escapes_names() {
        assert_eq!(quote("base.html"), "\"base.html\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
