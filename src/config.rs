//! Tuning parameters for the flock.
//!
//! [`FlockConfig`] holds every scalar the tick needs. It can be serialized to
//! JSON and loaded back by the runner; missing fields fall back to defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fixed multiplier coupling force units to velocity units.
pub const FORCE_TO_VELOCITY: f32 = 10.0;

/// Largest time step a single tick will integrate, in seconds.
///
/// Longer frames (e.g. after the host was suspended) are clamped to this.
pub const MAX_TICK_DELTA: f32 = 0.5;

/// Constant numerator of the boundary containment force.
pub const BOUNDARY_FORCE: f32 = 1.5;

/// Default lattice edge length (3³ = 27 agents).
pub const DEFAULT_EDGE_LENGTH: i64 = 3;

/// Complete set of flock tuning parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockConfig {
    /// Strength of the push back toward the origin near the outer sphere.
    pub outer_bounds_force_scaling: f32,
    /// Strength of the pull toward neighbors' summed heading.
    pub alignment_force_scaling: f32,
    /// Strength of the cohesion steer.
    pub cohesion_force_scaling: f32,
    /// Strength of the per-neighbor repulsion.
    pub separation_force_scaling: f32,
    /// Interaction distance; also the spatial grid cell size.
    pub neighbor_radius: f32,
    /// Radius of the containment sphere centered on the origin.
    pub outer_boundary_radius: f32,
    /// Velocity magnitude cap applied after every integration step.
    pub max_speed: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            outer_bounds_force_scaling: 1.0,
            alignment_force_scaling: 6.0,
            cohesion_force_scaling: 0.8,
            separation_force_scaling: 0.1,
            neighbor_radius: 5.0,
            outer_boundary_radius: 100.0,
            max_speed: 10.0,
        }
    }
}

impl FlockConfig {
    /// Create a config with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boundary containment coefficient.
    pub fn with_outer_bounds_scaling(mut self, scaling: f32) -> Self {
        self.outer_bounds_force_scaling = scaling;
        self
    }

    /// Set the alignment coefficient.
    pub fn with_alignment_scaling(mut self, scaling: f32) -> Self {
        self.alignment_force_scaling = scaling;
        self
    }

    /// Set the cohesion coefficient.
    pub fn with_cohesion_scaling(mut self, scaling: f32) -> Self {
        self.cohesion_force_scaling = scaling;
        self
    }

    /// Set the separation coefficient.
    pub fn with_separation_scaling(mut self, scaling: f32) -> Self {
        self.separation_force_scaling = scaling;
        self
    }

    /// Set the neighbor radius (and grid cell size).
    pub fn with_neighbor_radius(mut self, radius: f32) -> Self {
        self.neighbor_radius = radius;
        self
    }

    /// Set the containment sphere radius.
    pub fn with_outer_boundary_radius(mut self, radius: f32) -> Self {
        self.outer_boundary_radius = radius;
        self
    }

    /// Set the speed cap.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Check every parameter, returning the first violation.
    ///
    /// Invalid values are rejected rather than clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalings = [
            ("outer_bounds_force_scaling", self.outer_bounds_force_scaling),
            ("alignment_force_scaling", self.alignment_force_scaling),
            ("cohesion_force_scaling", self.cohesion_force_scaling),
            ("separation_force_scaling", self.separation_force_scaling),
        ];
        for (name, value) in scalings {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeScaling { name, value });
            }
        }

        if !self.neighbor_radius.is_finite() {
            return Err(ConfigError::NonFinite { name: "neighbor_radius" });
        }
        if self.neighbor_radius <= 0.0 {
            return Err(ConfigError::NonPositiveNeighborRadius(self.neighbor_radius));
        }
        if !self.outer_boundary_radius.is_finite() {
            return Err(ConfigError::NonFinite { name: "outer_boundary_radius" });
        }
        if self.outer_boundary_radius <= 0.0 {
            return Err(ConfigError::NonPositiveOuterRadius(self.outer_boundary_radius));
        }
        if !self.max_speed.is_finite() {
            return Err(ConfigError::NonFinite { name: "max_speed" });
        }
        if self.max_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMaxSpeed(self.max_speed));
        }
        Ok(())
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
