//! Expander and forwarder configuration
//!
//! This module defines the small set of knobs shared by the message expander
//! and the log forwarder. Everything has a sensible default so an empty
//! `[logging]` table deserializes to a working configuration.

use crate::types::LogLevel;
use serde::{Deserialize, Serialize};

/// Extra capacity reserved beyond the raw message length
pub const DEFAULT_RESERVE_SLACK: usize = 100;

/// Capacity of the bounded message buffer handed to the logger callback
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 2000;

/// Configuration for message expansion and forwarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpanderConfig {
    /// Extra bytes reserved on top of the raw message before scanning
    #[serde(default = "default_reserve_slack")]
    pub reserve_slack: usize,

    /// Bounded output capacity, terminator included
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Minimum severity that reaches the sink
    #[serde(default)]
    pub min_level: LogLevel,

    /// Whether to substitute variable references at all
    #[serde(default = "default_true")]
    pub expand_references: bool,
}

fn default_reserve_slack() -> usize {
    DEFAULT_RESERVE_SLACK
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            reserve_slack: DEFAULT_RESERVE_SLACK,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            min_level: LogLevel::default(),
            expand_references: true,
        }
    }
}

impl ExpanderConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the reservation slack
    pub fn with_reserve_slack(mut self, slack: usize) -> Self {
        self.reserve_slack = slack;
        self
    }

    /// Builder method: set the bounded output capacity
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Builder method: set the minimum forwarded level
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Builder method: enable or disable reference substitution
    pub fn with_reference_expansion(mut self, enabled: bool) -> Self {
        self.expand_references = enabled;
        self
    }

    /// Check if a record at `level` should be forwarded
    pub fn should_forward(&self, level: LogLevel) -> bool {
        level.passes(self.min_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExpanderConfig::new()
            .with_reserve_slack(16)
            .with_max_message_size(64)
            .with_min_level(LogLevel::Warning)
            .with_reference_expansion(false);

        assert_eq!(config.reserve_slack, 16);
        assert_eq!(config.max_message_size, 64);
        assert_eq!(config.min_level, LogLevel::Warning);
        assert!(!config.expand_references);
    }

    #[test]
    fn test_filter_logic() {
        let config = ExpanderConfig::new().with_min_level(LogLevel::Warning);

        assert!(config.should_forward(LogLevel::Warning));
        assert!(config.should_forward(LogLevel::Fatal));
        assert!(!config.should_forward(LogLevel::Info));
    }

    #[test]
    fn test_defaults() {
        let config = ExpanderConfig::default();
        assert_eq!(config.reserve_slack, DEFAULT_RESERVE_SLACK);
        assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.expand_references);
    }
}
