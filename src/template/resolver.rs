//! Template name resolution

use tracing::debug;

use super::engine::{ParsedTemplate, TemplateEngine};
use crate::error::ConfiguratorError;

/// Locate and parse a template by name.
///
/// A name that no search directory contains is a `TemplateNotFound` error
/// carrying the full search path that was tried.
pub fn resolve<E: TemplateEngine>(
    engine: &E,
    name: &str,
) -> Result<ParsedTemplate, ConfiguratorError> {
    let source = engine
        .load(name)?
        .ok_or_else(|| ConfiguratorError::TemplateNotFound {
            name: name.to_string(),
            search_path: engine.search_path().clone(),
        })?;

    let parsed = engine.parse(source)?;
    debug!(template = %parsed.name, path = %parsed.path.display(), "resolved template");
    Ok(parsed)
}
