//! Error types shared by the transform, mask and filter stages

use thiserror::Error;

/// Errors raised by the spectral filtering pipeline
///
/// Every variant is a precondition failure detected before any transform
/// runs, so none of them is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Dimension mismatch in {context}: expected {expected:?}, found {found:?}")]
    Dimension {
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Buffer is empty (height and width must both be > 0)")]
    EmptyBuffer,

    #[error("Unsupported channel count {0} (expected 1 for grayscale or 3 for RGB)")]
    ChannelCount(usize),

    #[error("Channel index {index} out of range for an image with {channels} channel(s)")]
    InvalidChannel { index: usize, channels: usize },

    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },
}

impl FilterError {
    pub(crate) fn dimension(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        FilterError::Dimension {
            context,
            expected,
            found,
        }
    }

    pub(crate) fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        FilterError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
