//! Error types for road network generation

use std::fmt;

/// Errors that can occur during network generation or queries
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Initial sampling could not find enough passable locations
    TerrainExhausted {
        /// Number of attraction points requested
        requested: usize,
        /// Number of passable locations found before giving up
        accepted: usize,
        /// Number of samples drawn
        attempts: usize,
    },
    /// Requested segment ID does not exist
    SegmentNotFound(usize),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            NetworkError::TerrainExhausted {
                requested,
                accepted,
                attempts,
            } => write!(
                f,
                "terrain exhausted: found {} of {} passable points after {} samples",
                accepted, requested, attempts
            ),
            NetworkError::SegmentNotFound(id) => write!(f, "segment not found: {}", id),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Result type alias for road network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
