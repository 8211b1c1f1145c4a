//! Shared, swappable template collections.
//!
//! [`Templates`] is immutable, so reloading means building a new collection
//! and swapping it in. [`SharedTemplates`] does the swap: readers take an
//! `Arc` snapshot with [`current`](SharedTemplates::current) and keep
//! rendering against it even while a reload replaces the collection.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::BuildError;
use crate::registry::Templates;

/// A cloneable handle to the current template collection.
#[derive(Debug, Clone)]
pub struct SharedTemplates {
    current: Arc<RwLock<Arc<Templates>>>,
}

impl SharedTemplates {
    /// Wraps a built collection.
    pub fn new(templates: Templates) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(templates))),
        }
    }

    /// Returns a snapshot of the current collection.
    pub fn current(&self) -> Arc<Templates> {
        Arc::clone(&self.current.read())
    }

    /// Rebuilds the collection from its root and config, then swaps it in.
    ///
    /// On failure the current collection stays in place and the error is
    /// returned.
    pub fn reload(&self) -> Result<Arc<Templates>, BuildError> {
        let rebuilt = Arc::new(self.current().rebuild()?);
        *self.current.write() = Arc::clone(&rebuilt);
        tracing::debug!(views = rebuilt.len(), "template collection reloaded");
        Ok(rebuilt)
    }

    /// Swaps in a collection built elsewhere and returns the previous one.
    pub fn replace(&self, templates: Templates) -> Arc<Templates> {
        std::mem::replace(&mut *self.current.write(), Arc::new(templates))
    }
}

impl From<Templates> for SharedTemplates {
    fn from(templates: Templates) -> Self {
        Self::new(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, relative_path: &str, content: &str) {
        let path = dir.join(relative_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn render(templates: &Templates) -> String {
        templates
            .get("views/index.html")
            .render_to_string("base.html", ())
            .unwrap()
    }

    #[test]
    fn test_reload_swaps_in_new_collection() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.html", "{% block body %}{% endblock %}");
        write(dir.path(), "views/index.html", "{% block body %}v1{% endblock %}");

        let shared = SharedTemplates::new(Templates::load(dir.path()).unwrap());
        let before = shared.current();
        assert_eq!(render(&before), "v1");

        write(dir.path(), "views/index.html", "{% block body %}v2{% endblock %}");
        shared.reload().unwrap();

        // Old snapshots are unaffected.
        assert_eq!(render(&before), "v1");
        assert_eq!(render(&shared.current()), "v2");
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.html", "{% block body %}{% endblock %}");
        write(dir.path(), "views/index.html", "{% block body %}ok{% endblock %}");

        let shared = SharedTemplates::new(Templates::load(dir.path()).unwrap());
        write(dir.path(), "views/index.html", "{% block body %}broken");

        let err = shared.reload().unwrap_err();
        assert!(err.is_compile_error());
        assert_eq!(render(&shared.current()), "ok");
    }

    #[test]
    fn test_clones_share_the_collection() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.html", "{% block body %}{% endblock %}");
        write(dir.path(), "views/index.html", "{% block body %}a{% endblock %}");

        let shared = SharedTemplates::from(Templates::load(dir.path()).unwrap());
        let other = shared.clone();

        write(dir.path(), "views/index.html", "{% block body %}b{% endblock %}");
        let previous = other.replace(Templates::load(dir.path()).unwrap());

        assert_eq!(render(&previous), "a");
        assert_eq!(render(&shared.current()), "b");
    }
}
