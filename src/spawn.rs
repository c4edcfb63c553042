//! Population construction.
//!
//! Agents start on an `edge_length³` cube lattice with unit spacing, centered
//! on the origin, each moving at full speed in a random direction. All
//! randomness in the crate happens here, from a seeded RNG, so a given seed
//! always produces the same population.

use crate::agent::{Agent, AgentStore};
use crate::error::ConfigError;
use crate::integrator::clamp_speed;
use crate::palette::Palette;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Largest population a lattice may hold (a 256³ cube).
pub const MAX_POPULATION: usize = 1 << 24;

/// Number of agents an `edge_length³` lattice holds.
///
/// Zero edge length is an empty population; negative is an error.
pub fn lattice_count(edge_length: i64) -> Result<usize, ConfigError> {
    if edge_length < 0 {
        return Err(ConfigError::NegativeEdgeLength(edge_length));
    }
    usize::try_from(edge_length)
        .ok()
        .and_then(|edge| edge.checked_mul(edge)?.checked_mul(edge))
        .filter(|&count| count <= MAX_POPULATION)
        .ok_or(ConfigError::PopulationTooLarge(edge_length))
}

/// Position of lattice slot `index` for an edge of `edge_length` agents.
///
/// Slots fill X first, then Y, then Z, offset by `-edge_length / 2` on each
/// axis so the cube is centered on the origin.
pub fn lattice_position(index: usize, edge_length: usize) -> Vec3 {
    if edge_length == 0 {
        return Vec3::ZERO;
    }
    let offset = -(edge_length as f32) / 2.0;
    let x = index % edge_length;
    let y = (index / edge_length) % edge_length;
    let z = index / (edge_length * edge_length) % edge_length;
    Vec3::new(x as f32, y as f32, z as f32) + Vec3::splat(offset)
}

/// Seeded helper handing out random directions and tags while spawning.
pub struct SpawnContext {
    /// Index of the agent being spawned.
    pub index: usize,
    /// Total number of agents being spawned.
    pub count: usize,
    rng: SmallRng,
}

impl SpawnContext {
    pub(crate) fn new(count: usize, seed: u64) -> Self {
        Self {
            index: 0,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniformly distributed unit vector.
    pub fn random_direction(&mut self) -> Vec3 {
        let z: f32 = self.rng.gen_range(-1.0..=1.0);
        let theta = self.rng.gen_range(0.0..TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    /// Random colour from `palette`.
    pub fn palette_color(&mut self, palette: Palette) -> Vec3 {
        palette.pick(&mut self.rng)
    }

    /// Direct access to the RNG for custom tags.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

/// Build an `edge_length³` lattice, asking `tag` for each agent's identity tag.
pub fn lattice_with<T, F>(
    edge_length: i64,
    max_speed: f32,
    seed: u64,
    mut tag: F,
) -> Result<AgentStore<T>, ConfigError>
where
    F: FnMut(&mut SpawnContext) -> T,
{
    if !max_speed.is_finite() {
        return Err(ConfigError::NonFinite { name: "max_speed" });
    }
    if max_speed <= 0.0 {
        return Err(ConfigError::NonPositiveMaxSpeed(max_speed));
    }
    let count = lattice_count(edge_length)?;
    let edge = edge_length as usize;

    let mut ctx = SpawnContext::new(count, seed);
    let mut agents = Vec::with_capacity(count);
    for index in 0..count {
        ctx.index = index;
        let velocity = clamp_speed(ctx.random_direction() * max_speed, max_speed);
        let tag = tag(&mut ctx);
        agents.push(Agent::new(lattice_position(index, edge), velocity, tag));
    }

    log::debug!("spawned {} agents on a {}³ lattice (seed {})", count, edge_length, seed);
    Ok(AgentStore::from_agents(agents))
}

/// Build an `edge_length³` lattice tagged with random colours from `palette`.
pub fn initialize_population(
    edge_length: i64,
    max_speed: f32,
    seed: u64,
    palette: Palette,
) -> Result<AgentStore<Vec3>, ConfigError> {
    lattice_with(edge_length, max_speed, seed, |ctx| ctx.palette_color(palette))
}
