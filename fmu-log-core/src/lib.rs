//! FMU Log Library
//!
//! Turns log calls from a simulated component (FMU) into readable text. The
//! component refers to model variables by value reference using tokens like
//! `#r42#`; this library replaces them with variable names taken from the
//! model description.
//!
//! # Architecture
//!
//! - [`MessageExpander`] scans a message once, left to right, substituting
//!   `#<type><vr>#` tokens and collapsing `##` into `#`
//! - [`LogForwarder`] prefixes category and status, infers the severity,
//!   filters by level, expands and delivers to a [`LogSink`]
//! - [`ModelDescription`] stores variables and units and resolves references
//! - [`ModelCounts`] tallies variables by variability, causality and type
//!
//! Parsing the model description XML is NOT part of this library; callers
//! populate a [`ModelDescription`] from whatever source they have.
//!
//! # Example Usage
//!
//! ```
//! use fmu_log_core::{
//!     BaseType, Causality, CollectingSink, ExpanderConfig, LogForwarder,
//!     ModelDescription, Status, VariableDefinition, Variability,
//! };
//!
//! let mut model = ModelDescription::new();
//! model
//!     .add_variable(VariableDefinition::new(
//!         "Temperature",
//!         BaseType::Real,
//!         42,
//!         Variability::Continuous,
//!         Causality::Output,
//!     ))
//!     .unwrap();
//!
//! let mut forwarder = LogForwarder::new(CollectingSink::new(), ExpanderConfig::new())
//!     .with_resolver(&model);
//! forwarder.forward("plant", Status::Warning, Some("logEvents"), "value #r42# exceeded");
//!
//! assert_eq!(
//!     forwarder.last_message(),
//!     "[logEvents][FMU status:Warning] value Temperature exceeded"
//! );
//! ```

// Public modules
pub mod config;
pub mod counts;
pub mod expander;
pub mod forwarder;
pub mod logging;
pub mod model;
pub mod types;

// Re-export main types for convenience
pub use config::ExpanderConfig;
pub use counts::ModelCounts;
pub use expander::{truncate_to_capacity, MessageExpander, ALLOCATION_FALLBACK};
pub use forwarder::LogForwarder;
pub use logging::{
    format_component_log_line, CollectingSink, LogCrateSink, LogRecord, LogSink, StatusSink,
    StdoutSink, EXPANDER_MODULE,
};
pub use model::{
    convert_from_display_unit, convert_to_display_unit, DisplayUnit, ModelDescription,
    ModelStats, Unit, VariableDefinition, VariableResolver,
};
pub use types::{
    AliasKind, BaseType, Causality, ExpandError, LogLevel, ModelError, Result, Status,
    ValueReference, Variability,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty model resolves nothing
        let model = ModelDescription::new();
        let stats = model.stats();
        assert_eq!(stats.num_variables, 0);
        assert!(model.resolve(BaseType::Real, 0).is_none());
    }
}
