//! Error types for shoal.
//!
//! Configuration problems and malformed tick input are reported to the caller.
//! Numeric degeneracies inside the force model (zero-length vectors, coincident
//! agents) are not errors and never show up here.

use std::fmt;

/// Errors caused by invalid tuning parameters or population size.
#[derive(Debug)]
pub enum ConfigError {
    /// Neighbor radius (and grid cell size) must be strictly positive.
    NonPositiveNeighborRadius(f32),
    /// Outer boundary radius must be strictly positive.
    NonPositiveOuterRadius(f32),
    /// Maximum speed must be strictly positive.
    NonPositiveMaxSpeed(f32),
    /// A force scaling coefficient was negative.
    NegativeScaling {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A parameter was NaN or infinite.
    NonFinite {
        /// Name of the offending field.
        name: &'static str,
    },
    /// Lattice edge length was negative.
    NegativeEdgeLength(i64),
    /// `edge_length³` does not fit in memory-addressable agent counts.
    PopulationTooLarge(i64),
    /// Failed to parse a JSON config.
    Json(serde_json::Error),
    /// Failed to read or write a config file.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveNeighborRadius(r) => {
                write!(f, "Neighbor radius must be > 0, got {}", r)
            }
            ConfigError::NonPositiveOuterRadius(r) => {
                write!(f, "Outer boundary radius must be > 0, got {}", r)
            }
            ConfigError::NonPositiveMaxSpeed(s) => write!(f, "Max speed must be > 0, got {}", s),
            ConfigError::NegativeScaling { name, value } => {
                write!(f, "Force scaling `{}` must be >= 0, got {}", name, value)
            }
            ConfigError::NonFinite { name } => write!(f, "Parameter `{}` must be finite", name),
            ConfigError::NegativeEdgeLength(n) => {
                write!(f, "Lattice edge length must be >= 0, got {}", n)
            }
            ConfigError::PopulationTooLarge(n) => {
                write!(f, "Lattice edge length {} yields too many agents", n)
            }
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Errors caused by a single malformed tick request.
///
/// A rejected tick leaves the flock exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickError {
    /// Delta time was negative, NaN or infinite.
    InvalidDeltaTime(f32),
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::InvalidDeltaTime(dt) => {
                write!(f, "Delta time must be finite and >= 0, got {}", dt)
            }
        }
    }
}

impl std::error::Error for TickError {}

/// Any error surfaced by the flock driver.
#[derive(Debug)]
pub enum FlockError {
    /// Invalid configuration or population size.
    Config(ConfigError),
    /// Malformed tick input.
    Tick(TickError),
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockError::Config(e) => write!(f, "Configuration error: {}", e),
            FlockError::Tick(e) => write!(f, "Tick rejected: {}", e),
        }
    }
}

impl std::error::Error for FlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlockError::Config(e) => Some(e),
            FlockError::Tick(e) => Some(e),
        }
    }
}

impl From<ConfigError> for FlockError {
    fn from(e: ConfigError) -> Self {
        FlockError::Config(e)
    }
}

impl From<TickError> for FlockError {
    fn from(e: TickError) -> Self {
        FlockError::Tick(e)
    }
}
