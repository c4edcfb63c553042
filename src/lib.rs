//! # shoal - spatially hashed boids
//!
//! A CPU flocking core for large populations of agents in 3D. Every tick each
//! agent steers by four forces (boundary containment, alignment, cohesion,
//! separation) computed from its neighbors, then integrates velocity and
//! position.
//!
//! Rendering, UI and frame scheduling are left to the host: it builds a
//! [`Flock`], calls [`Flock::tick`] once per frame, and reads positions,
//! velocities and facings back (or [`Flock::instances`] for a GPU upload).
//!
//! ## Quick Start
//!
//! ```
//! use shoal::prelude::*;
//!
//! let mut flock = Simulation::new()
//!     .with_edge_length(5)          // 5³ = 125 agents on a lattice
//!     .with_seed(42)
//!     .with_separation_scaling(0.2)
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     flock.tick(1.0 / 60.0).unwrap();
//! }
//!
//! let p = flock.position(0).unwrap();
//! assert!(p.is_finite());
//! ```
//!
//! ## Neighbor Queries
//!
//! Neighbors are found with a uniform grid ([`SpatialGrid`]) whose cell size
//! equals the neighbor radius. A query scans only the 3×3×3 block of cells
//! around an agent and then filters by exact distance, instead of checking
//! every pair.
//!
//! ## Forces
//!
//! | Force | Formula |
//! |-------|---------|
//! | Boundary | `-p̂ · 1.5 / max(R - ‖p‖, ε) · k` |
//! | Alignment | `normalize(Σ vᵢ) · k` |
//! | Cohesion | `normalize(mean(vᵢ) - p) · k` |
//! | Separation | `Σ (p - pᵢ) / ‖p - pᵢ‖ · k` |
//!
//! ## Features
//!
//! - `parallel` - compute per-agent forces on the rayon thread pool.

pub mod agent;
pub mod config;
mod error;
pub mod forces;
mod instance;
pub mod integrator;
pub mod palette;
mod simulation;
pub mod spatial;
pub mod spawn;

pub use agent::{Agent, AgentStore, Kinematics};
pub use bytemuck;
pub use config::FlockConfig;
pub use error::{ConfigError, FlockError, TickError};
pub use forces::ForceBreakdown;
pub use glam::{IVec3, Quat, Vec3};
pub use instance::AgentInstance;
pub use palette::Palette;
pub use simulation::{Flock, RunState, Simulation, TickStats};
pub use spatial::{NeighborGraph, SpatialGrid};
pub use spawn::{initialize_population, SpawnContext};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use shoal::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{Agent, AgentStore};
    pub use crate::config::FlockConfig;
    pub use crate::error::{ConfigError, FlockError, TickError};
    pub use crate::palette::Palette;
    pub use crate::simulation::{Flock, RunState, Simulation, TickStats};
    pub use crate::{Quat, Vec3};
}
