//! Log forwarding
//!
//! Receives log calls from a simulated component, prefixes them with category
//! and status, expands variable references against the model description and
//! hands the result to a sink.
//!
//! A forwarder owns its message buffers and is one forwarding context: it is
//! `&mut self` throughout and cannot be used from two threads at once.

use crate::config::ExpanderConfig;
use crate::expander::{truncate_to_capacity, until_sentinel, MessageExpander};
use crate::logging::LogSink;
use crate::model::VariableResolver;
use crate::types::{LogLevel, Status};
use std::fmt::{self, Write};

/// Status text used for codes outside the known set
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Forwards component log calls to a sink
pub struct LogForwarder<'a, S: LogSink> {
    sink: S,
    config: ExpanderConfig,
    expander: MessageExpander,
    resolver: Option<&'a dyn VariableResolver>,
    /// Prefixed message before expansion
    formatted: String,
    /// Last message delivered to the sink
    buffer: String,
}

impl<'a, S: LogSink> LogForwarder<'a, S> {
    /// Create a forwarder without a model attached. Messages are passed
    /// through without reference expansion until a resolver is set.
    pub fn new(sink: S, config: ExpanderConfig) -> Self {
        Self {
            sink,
            expander: MessageExpander::with_config(&config),
            config,
            resolver: None,
            formatted: String::new(),
            buffer: String::new(),
        }
    }

    /// Builder method: attach the variable resolver
    pub fn with_resolver(mut self, resolver: &'a dyn VariableResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The text most recently delivered to the sink
    pub fn last_message(&self) -> &str {
        &self.buffer
    }

    /// Forward one component log call.
    ///
    /// Returns `true` if the message passed the level filter and was delivered.
    pub fn forward(
        &mut self,
        instance_name: &str,
        status: Status,
        category: Option<&str>,
        message: impl fmt::Display,
    ) -> bool {
        self.forward_at(instance_name, LogLevel::from(status), status.as_str(), category, message)
    }

    /// Forward a log call carrying a raw status code. Unknown codes are
    /// treated as fatal.
    pub fn forward_code(
        &mut self,
        instance_name: &str,
        status_code: i32,
        category: Option<&str>,
        message: impl fmt::Display,
    ) -> bool {
        match Status::from_code(status_code) {
            Some(status) => self.forward(instance_name, status, category, message),
            None => self.forward_at(instance_name, LogLevel::Fatal, UNKNOWN_STATUS, category, message),
        }
    }

    fn forward_at(
        &mut self,
        instance_name: &str,
        level: LogLevel,
        status_text: &str,
        category: Option<&str>,
        message: impl fmt::Display,
    ) -> bool {
        if !self.config.should_forward(level) {
            log::trace!("Dropping {} message from {}", level, instance_name);
            return false;
        }

        self.formatted.clear();
        if let Some(category) = category {
            let _ = write!(self.formatted, "[{}]", category);
        }
        let _ = write!(self.formatted, "[FMU status:{}] {}", status_text, message);

        match self.resolver {
            Some(resolver) if self.config.expand_references => {
                let mut filtered = LevelFilterSink {
                    inner: &mut self.sink,
                    min_level: self.config.min_level,
                };
                self.expander
                    .expand_into(&self.formatted, resolver, &mut filtered, &mut self.buffer);
            }
            _ => {
                self.buffer.clear();
                self.buffer.push_str(until_sentinel(&self.formatted));
            }
        }
        truncate_to_capacity(&mut self.buffer, self.config.max_message_size);

        self.sink.log(instance_name, level, &self.buffer);
        true
    }
}

/// Applies the forwarder's level filter to diagnostics raised mid-expansion
struct LevelFilterSink<'s, S: LogSink> {
    inner: &'s mut S,
    min_level: LogLevel,
}

impl<S: LogSink> LogSink for LevelFilterSink<'_, S> {
    fn log(&mut self, module: &str, level: LogLevel, message: &str) {
        if level.passes(self.min_level) {
            self.inner.log(module, level, message);
        }
    }
}
