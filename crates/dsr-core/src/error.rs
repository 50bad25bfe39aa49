//! Error types for the dsr-core crate.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    TooShort { min: usize, actual: usize },
    PayloadTooLong { max: usize, actual: usize },
    TruncatedOption { offset: usize },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::TooShort { min, actual } => {
                write!(
                    f,
                    "buffer too short: need at least {min} bytes, got {actual}"
                )
            }
            WireError::PayloadTooLong { max, actual } => {
                write!(f, "payload too long: max {max} bytes, got {actual}")
            }
            WireError::TruncatedOption { offset } => {
                write!(f, "truncated option at stream offset {offset}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WireError {}
