//! Core types for the FMU log library
//!
//! This module defines the shared vocabulary used by the expander, the
//! forwarder and the model description store: variable classifications,
//! component call statuses, log levels and the error types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for expansion operations
pub type Result<T> = std::result::Result<T, ExpandError>;

/// Value reference of a model variable
pub type ValueReference = u32;

/// Base type of a model variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Real,
    Integer,
    Boolean,
    String,
    Enumeration,
}

impl BaseType {
    /// Map a reference token type character to a base type.
    ///
    /// Only `r`, `i`, `b` and `s` are recognized. Enumerations cannot be
    /// referenced from log messages.
    pub fn from_type_char(c: u8) -> Option<Self> {
        match c {
            b'r' => Some(BaseType::Real),
            b'i' => Some(BaseType::Integer),
            b'b' => Some(BaseType::Boolean),
            b's' => Some(BaseType::String),
            _ => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Real => write!(f, "Real"),
            BaseType::Integer => write!(f, "Integer"),
            BaseType::Boolean => write!(f, "Boolean"),
            BaseType::String => write!(f, "String"),
            BaseType::Enumeration => write!(f, "Enumeration"),
        }
    }
}

/// Variability of a model variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variability {
    Constant,
    Fixed,
    Tunable,
    Discrete,
    Continuous,
}

/// Causality of a model variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Causality {
    Parameter,
    CalculatedParameter,
    Input,
    Output,
    Local,
    Independent,
}

/// Alias relation of a variable to the variable owning its value reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AliasKind {
    #[default]
    NoAlias,
    Alias,
    NegatedAlias,
}

/// Status returned by the simulated component together with a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Discard,
    Error,
    Fatal,
    Pending,
}

impl Status {
    /// Decode a raw status code as passed over the component interface
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            1 => Some(Status::Warning),
            2 => Some(Status::Discard),
            3 => Some(Status::Error),
            4 => Some(Status::Fatal),
            5 => Some(Status::Pending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "Warning",
            Status::Discard => "Discard",
            Status::Error => "Error",
            Status::Fatal => "Fatal",
            Status::Pending => "Pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a log record, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Verbose,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Check whether a record at this level passes a minimum threshold
    pub fn passes(&self, min_level: LogLevel) -> bool {
        *self >= min_level
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for LogLevel {
    /// Infer the severity of a component log call from its status
    fn from(status: Status) -> Self {
        match status {
            Status::Ok | Status::Discard | Status::Pending => LogLevel::Info,
            Status::Warning => LogLevel::Warning,
            Status::Error => LogLevel::Error,
            Status::Fatal => LogLevel::Fatal,
        }
    }
}

impl From<LogLevel> for Status {
    /// Map a library log level back to the status reported to the component's
    /// logger callback
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug | LogLevel::Verbose | LogLevel::Info => Status::Ok,
            LogLevel::Warning => Status::Warning,
            LogLevel::Error => Status::Error,
            LogLevel::Fatal => Status::Fatal,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Trace,
            LogLevel::Verbose => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error | LogLevel::Fatal => log::Level::Error,
        }
    }
}

/// Errors that can occur while expanding variable references
///
/// The recoverable kinds carry the output built up to the failure point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error("Expected type specification character 'r', 'i', 'b' or 's' in log message here: '{0}'")]
    MalformedType(String),

    #[error("Expected value reference in log message here: '{0}'")]
    MissingReference(String),

    #[error("Expected terminating '#' in log message here: '{0}'")]
    UnterminatedToken(String),

    #[error("Could not decode value reference in log message here: '{0}'")]
    DecodeError(String),

    #[error("Could not find variable referenced in log message here: '{0}'")]
    UnresolvedReference(String),

    #[error("Could not allocate memory for the log message")]
    AllocationError,
}

impl ExpandError {
    /// Whether the original message can be restored after this error
    pub fn restores_original(&self) -> bool {
        !matches!(self, ExpandError::AllocationError)
    }
}

/// Errors raised while building a model description
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),

    #[error("Variable {variable} references unknown unit: {unit}")]
    UnknownUnit { variable: String, unit: String },

    #[error("Variable {variable} references unknown display unit: {display_unit}")]
    UnknownDisplayUnit { variable: String, display_unit: String },

    #[error("Display unit {0} has a zero factor")]
    ZeroFactor(String),

    #[error("Duplicate unit name: {0}")]
    DuplicateUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_chars() {
        assert_eq!(BaseType::from_type_char(b'r'), Some(BaseType::Real));
        assert_eq!(BaseType::from_type_char(b'i'), Some(BaseType::Integer));
        assert_eq!(BaseType::from_type_char(b'b'), Some(BaseType::Boolean));
        assert_eq!(BaseType::from_type_char(b's'), Some(BaseType::String));
        assert_eq!(BaseType::from_type_char(b'e'), None);
        assert_eq!(BaseType::from_type_char(b'R'), None);
        assert_eq!(BaseType::from_type_char(0), None);
    }

    #[test]
    fn test_status_to_level() {
        assert_eq!(LogLevel::from(Status::Ok), LogLevel::Info);
        assert_eq!(LogLevel::from(Status::Discard), LogLevel::Info);
        assert_eq!(LogLevel::from(Status::Pending), LogLevel::Info);
        assert_eq!(LogLevel::from(Status::Warning), LogLevel::Warning);
        assert_eq!(LogLevel::from(Status::Error), LogLevel::Error);
        assert_eq!(LogLevel::from(Status::Fatal), LogLevel::Fatal);
    }

    #[test]
    fn test_level_to_status() {
        assert_eq!(Status::from(LogLevel::Verbose), Status::Ok);
        assert_eq!(Status::from(LogLevel::Warning), Status::Warning);
        assert_eq!(Status::from(LogLevel::Fatal), Status::Fatal);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Error.passes(LogLevel::Warning));
        assert!(!LogLevel::Info.passes(LogLevel::Warning));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::from_code(0), Some(Status::Ok));
        assert_eq!(Status::from_code(5), Some(Status::Pending));
        assert_eq!(Status::from_code(6), None);
        assert_eq!(Status::from_code(-1), None);
        assert_eq!(Status::Ok.to_string(), "OK");
    }

    #[test]
    fn test_allocation_error_does_not_restore() {
        assert!(!ExpandError::AllocationError.restores_original());
        assert!(ExpandError::MissingReference("x".to_string()).restores_original());
    }
}
