//! TOML-based configuration for the correlation buffers.
//!
//! All durations are virtual-clock milliseconds. Defaults mirror the
//! original module: 50 entries / 30 s for both correlation buffers,
//! 400 entries / 30 s residency for the send queue.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level buffer configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BufferConfig {
    #[serde(default)]
    pub maintenance: MaintenanceSection,
    #[serde(default)]
    pub passive: PassiveSection,
    #[serde(default)]
    pub queue: QueueSection,
}

impl BufferConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

/// The `[maintenance]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceSection {
    /// Hard entry-count ceiling; oldest-first eviction past it.
    #[serde(default = "default_buffer_len")]
    pub max_len: usize,
    /// Entry lifetime in milliseconds.
    #[serde(default = "default_buffer_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for MaintenanceSection {
    fn default() -> Self {
        Self {
            max_len: default_buffer_len(),
            timeout_ms: default_buffer_timeout_ms(),
        }
    }
}

/// The `[passive]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PassiveSection {
    #[serde(default = "default_buffer_len")]
    pub max_len: usize,
    #[serde(default = "default_buffer_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PassiveSection {
    fn default() -> Self {
        Self {
            max_len: default_buffer_len(),
            timeout_ms: default_buffer_timeout_ms(),
        }
    }
}

/// The `[queue]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    /// Global cap shared across all next-hops.
    #[serde(default = "default_queue_size")]
    pub max_size: usize,
    /// Maximum residency in milliseconds before cleanup removes an entry.
    #[serde(default = "default_queue_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            max_size: default_queue_size(),
            max_delay_ms: default_queue_delay_ms(),
        }
    }
}

fn default_buffer_len() -> usize {
    50
}

fn default_buffer_timeout_ms() -> u64 {
    30_000
}

fn default_queue_size() -> usize {
    400
}

fn default_queue_delay_ms() -> u64 {
    30_000
}
