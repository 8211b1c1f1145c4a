//! Two-pass compilation of discovered sources.
//!
//! 1. Every view is parsed on its own, in a fresh environment, under its
//!    relative path.
//! 2. Every partial is attached to every compiled view.
//!
//! Pass 2 parses each partial once per view. That keeps every view's
//! template namespace independent at O(views x partials) build cost. Both
//! passes stop at the first syntax error.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::BuildError;
use crate::unit::CompiledView;
use crate::walk::Sources;

/// Compiles `sources` into one [`CompiledView`] per view.
pub fn compile(
    sources: &Sources,
    config: &LoaderConfig,
) -> Result<BTreeMap<String, CompiledView>, BuildError> {
    let mut units = BTreeMap::new();
    for (name, source) in &sources.views {
        let unit = CompiledView::new(name, source, config).map_err(|source| {
            BuildError::ViewSyntax {
                view: name.clone(),
                source,
            }
        })?;
        debug!(view = %name, "compiled view");
        units.insert(name.clone(), unit);
    }

    for (view, unit) in units.iter_mut() {
        for (partial, source) in &sources.partials {
            unit.attach(partial, source)
                .map_err(|source| BuildError::PartialSyntax {
                    partial: partial.clone(),
                    view: view.clone(),
                    source,
                })?;
        }
    }
    debug!(
        views = units.len(),
        partials = sources.partials.len(),
        "attached partials to views"
    );

    Ok(units)
}
