//! Error types for gesture classification

use crate::event::GestureKind;
use thiserror::Error;

/// Gesture configuration and registration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GestureError {
    /// Pinch hysteresis band is empty or inverted
    #[error("Invalid pinch thresholds: start {start} must be below end {end}")]
    InvalidThresholds { start: f32, end: f32 },

    /// A point threshold is not a positive finite distance
    #[error("Invalid point threshold '{name}': {value}")]
    InvalidPointThreshold { name: &'static str, value: f32 },

    /// A classifier of this kind is already registered
    #[error("Gesture source already registered: {0}")]
    DuplicateSource(GestureKind),

    /// Unknown joint name
    #[error("Unknown hand joint: {0}")]
    UnknownJoint(String),
}

/// Result type for gesture operations
pub type Result<T> = std::result::Result<T, GestureError>;
