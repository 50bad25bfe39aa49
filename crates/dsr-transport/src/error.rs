//! Transport layer error types.
//!
//! The buffers themselves speak `bool`/`Option` — duplicate suppression,
//! capacity eviction, and not-found are ordinary outcomes, not errors.
//! Only the configuration surface can fail.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
