//! Completeness check for bound variables

use tracing::debug;

use super::{Context, RawOptions, VariableSet};
use crate::error::ConfiguratorError;

/// Build a [`Context`] once every variable has a value.
///
/// Stops at the first absent variable in set order.
pub fn validate(vars: &VariableSet, options: &RawOptions) -> Result<Context, ConfiguratorError> {
    let mut context = Context::default();

    for name in vars.iter() {
        match options.get(name) {
            Some(value) => context.insert(name.to_string(), value.to_string()),
            None => {
                debug!(variable = %name, "context variable not provided");
                return Err(ConfiguratorError::MissingVariable {
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(context)
}
