// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for curve editing.

use crate::value::ValueKind;

/// Error raised by curve and editor operations
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// Keyframe index outside `[0, count)`
    #[error("Keyframe index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Keyframe count at the time of the call
        count: usize,
    },

    /// Component index not below the value kind's component count
    #[error("Component {component} is invalid for a value with {count} components")]
    InvalidComponent {
        /// Requested component
        component: usize,
        /// Component count of the value kind
        count: usize,
    },

    /// Adding would exceed the editor's keyframe limit
    #[error("Keyframe limit of {max} reached")]
    CapacityExceeded {
        /// Maximum keyframe count
        max: usize,
    },

    /// Value kind has no access strategy for this operation
    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Kind the curve stores
        expected: ValueKind,
        /// Kind that was supplied
        found: ValueKind,
    },

    /// Snapshot, settings or clipboard encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Settings file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for CurveError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ron::Error> for CurveError {
    fn from(err: ron::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ron::error::SpannedError> for CurveError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for curve operations
pub type Result<T> = std::result::Result<T, CurveError>;
