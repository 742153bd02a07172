//! Model description store and unit definitions
//!
//! This module contains the variable store consulted when expanding log
//! messages, the unit definitions with display unit conversion, and the
//! resolver trait the expander is written against.

pub mod description;
pub mod units;

use crate::types::{BaseType, ValueReference};
use std::collections::HashMap;

// Re-export key types for convenience
pub use description::{ModelDescription, ModelStats, VariableDefinition};
pub use units::{convert_from_display_unit, convert_to_display_unit, DisplayUnit, Unit};

/// Maps a (base type, value reference) pair to a variable name.
///
/// Implementations are only read during expansion.
pub trait VariableResolver {
    fn resolve(&self, base_type: BaseType, value_reference: ValueReference) -> Option<&str>;
}

impl VariableResolver for HashMap<(BaseType, ValueReference), String> {
    fn resolve(&self, base_type: BaseType, value_reference: ValueReference) -> Option<&str> {
        self.get(&(base_type, value_reference)).map(String::as_str)
    }
}

impl<R: VariableResolver + ?Sized> VariableResolver for &R {
    fn resolve(&self, base_type: BaseType, value_reference: ValueReference) -> Option<&str> {
        (**self).resolve(base_type, value_reference)
    }
}
