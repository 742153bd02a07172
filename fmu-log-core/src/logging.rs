//! Log sinks
//!
//! A sink receives `(module, level, message)` records from the expander and
//! the forwarder. Closures work as sinks directly; the structs below cover the
//! `log` facade, plain stdout, and the component-side callback signature.

use crate::types::{LogLevel, Status};

/// Module name used for diagnostics raised by the expander
pub const EXPANDER_MODULE: &str = "LOGGER";

/// Destination for log records
pub trait LogSink {
    fn log(&mut self, module: &str, level: LogLevel, message: &str);
}

impl<F> LogSink for F
where
    F: FnMut(&str, LogLevel, &str),
{
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        self(module, level, message)
    }
}

/// Forwards records to the `log` facade, using the module name as target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        log::log!(target: module, log::Level::from(level), "{}", message);
    }
}

/// A captured log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub module: String,
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every record in memory
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub records: Vec<LogRecord>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records captured at exactly `level`
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.records.iter().filter(|r| r.level == level).count()
    }
}

impl LogSink for CollectingSink {
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        self.records.push(LogRecord {
            module: module.to_string(),
            level,
            message: message.to_string(),
        });
    }
}

/// Prints `[LEVEL][module] message` lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn format_line(module: &str, level: LogLevel, message: &str) -> String {
        format!("[{}][{}] {}", level, module, message)
    }
}

impl LogSink for StdoutSink {
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        println!("{}", Self::format_line(module, level, message));
    }
}

/// Adapts records to the component logger callback
/// `(instance, status, category, message)`.
///
/// The level is mapped back to a status and its name becomes the category.
pub struct StatusSink<F>
where
    F: FnMut(&str, Status, &str, &str),
{
    callback: F,
}

impl<F> StatusSink<F>
where
    F: FnMut(&str, Status, &str, &str),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> LogSink for StatusSink<F>
where
    F: FnMut(&str, Status, &str, &str),
{
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        (self.callback)(module, Status::from(level), level.as_str(), message);
    }
}

/// Render the line printed by the default component-side logger:
/// `[instance][category][status=S]message`. Missing parts are omitted.
pub fn format_component_log_line(
    instance_name: Option<&str>,
    category: Option<&str>,
    status: Status,
    message: &str,
) -> String {
    let mut line = String::with_capacity(message.len() + 32);
    if let Some(instance) = instance_name {
        line.push('[');
        line.push_str(instance);
        line.push(']');
    }
    if let Some(category) = category {
        line.push('[');
        line.push_str(category);
        line.push(']');
    }
    line.push_str("[status=");
    line.push_str(status.as_str());
    line.push(']');
    line.push_str(message);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut records = Vec::new();
        {
            let mut sink = |module: &str, level: LogLevel, message: &str| {
                records.push((module.to_string(), level, message.to_string()));
            };
            sink.log("mod", LogLevel::Warning, "hello");
        }
        assert_eq!(records, vec![("mod".to_string(), LogLevel::Warning, "hello".to_string())]);
    }

    #[test]
    fn test_status_sink_maps_levels() {
        let mut calls = Vec::new();
        {
            let mut sink = StatusSink::new(|instance: &str, status, category: &str, message: &str| {
                calls.push((instance.to_string(), status, category.to_string(), message.to_string()));
            });
            sink.log(EXPANDER_MODULE, LogLevel::Warning, "bad token");
            sink.log("inst", LogLevel::Verbose, "chatter");
        }
        assert_eq!(calls[0].1, Status::Warning);
        assert_eq!(calls[0].2, "WARNING");
        assert_eq!(calls[1].1, Status::Ok);
        assert_eq!(calls[1].2, "VERBOSE");
    }

    #[test]
    fn test_stdout_line_format() {
        assert_eq!(
            StdoutSink::format_line("LOGGER", LogLevel::Warning, "oops"),
            "[WARNING][LOGGER] oops"
        );
    }

    #[test]
    fn test_component_log_line() {
        assert_eq!(
            format_component_log_line(Some("fmu1"), Some("logAll"), Status::Ok, "started"),
            "[fmu1][logAll][status=OK]started"
        );
        assert_eq!(
            format_component_log_line(None, None, Status::Error, "x"),
            "[status=Error]x"
        );
    }
}
