//! Simulation builder and per-tick driver.
//!
//! [`Simulation`] collects settings with method chaining and builds a
//! [`Flock`]. The flock owns the agent store and every scratch buffer a tick
//! needs, so steady-state ticks do not allocate.
//!
//! A tick is atomic from the caller's point of view:
//!
//! 1. snapshot every agent's position and velocity
//! 2. rebuild the spatial grid from the snapshot
//! 3. compute every agent's net force from the snapshot
//! 4. integrate every agent
//!
//! Forces only ever read the snapshot, so the result does not depend on the
//! order agents are visited in.

use crate::agent::{AgentStore, Kinematics};
use crate::config::{FlockConfig, DEFAULT_EDGE_LENGTH};
use crate::error::{ConfigError, FlockError, TickError};
use crate::forces::{self, ForceBreakdown, Neighborhood};
use crate::instance::AgentInstance;
use crate::integrator::{cap_delta, integrate};
use crate::palette::Palette;
use crate::spatial::{NeighborGraph, SpatialGrid};
use crate::spawn::{self, SpawnContext};
use glam::{Quat, Vec3};

/// A flock builder.
///
/// ```
/// use shoal::prelude::*;
///
/// let mut flock = Simulation::new()
///     .with_edge_length(4)
///     .with_seed(7)
///     .with_alignment_scaling(4.0)
///     .build()
///     .unwrap();
///
/// let stats = flock.tick(1.0 / 60.0).unwrap();
/// assert_eq!(stats.agent_count, 64);
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    edge_length: i64,
    seed: u64,
    palette: Palette,
    config: FlockConfig,
}

impl Simulation {
    /// Create a builder with default settings (3³ agents, default tuning).
    pub fn new() -> Self {
        Self {
            edge_length: DEFAULT_EDGE_LENGTH,
            seed: 0,
            palette: Palette::default(),
            config: FlockConfig::default(),
        }
    }

    /// Set the lattice edge length; the population is `edge_length³`.
    pub fn with_edge_length(mut self, edge_length: i64) -> Self {
        self.edge_length = edge_length;
        self
    }

    /// Seed for initial velocities and tags.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Palette the default colour tags are drawn from.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the whole tuning config.
    pub fn with_config(mut self, config: FlockConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_outer_bounds_scaling(mut self, scaling: f32) -> Self {
        self.config.outer_bounds_force_scaling = scaling;
        self
    }

    pub fn with_alignment_scaling(mut self, scaling: f32) -> Self {
        self.config.alignment_force_scaling = scaling;
        self
    }

    pub fn with_cohesion_scaling(mut self, scaling: f32) -> Self {
        self.config.cohesion_force_scaling = scaling;
        self
    }

    pub fn with_separation_scaling(mut self, scaling: f32) -> Self {
        self.config.separation_force_scaling = scaling;
        self
    }

    pub fn with_neighbor_radius(mut self, radius: f32) -> Self {
        self.config.neighbor_radius = radius;
        self
    }

    pub fn with_outer_boundary_radius(mut self, radius: f32) -> Self {
        self.config.outer_boundary_radius = radius;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.config.max_speed = max_speed;
        self
    }

    /// Validate the settings and build a colour-tagged flock.
    pub fn build(self) -> Result<Flock<Vec3>, ConfigError> {
        let palette = self.palette;
        self.build_with(move |ctx| ctx.palette_color(palette))
    }

    /// Validate the settings and build a flock with caller-chosen tags.
    pub fn build_with<T, F>(self, tag: F) -> Result<Flock<T>, ConfigError>
    where
        F: FnMut(&mut SpawnContext) -> T,
    {
        self.config.validate()?;
        let store = spawn::lattice_with(self.edge_length, self.config.max_speed, self.seed, tag)?;
        log::info!(
            "built flock of {} agents (edge {}, seed {})",
            store.len(),
            self.edge_length,
            self.seed
        );
        Ok(Flock::assemble(store, self.config, self.seed, self.palette))
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a flock. There is no terminal state; the host simply stops ticking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Built but not yet ticked.
    Idle,
    /// At least one tick has completed.
    Running,
}

/// Summary of one completed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickStats {
    /// 1-based index of this tick.
    pub tick: u64,
    pub agent_count: usize,
    /// Grid cells holding at least one agent.
    pub occupied_cells: usize,
    /// Total (agent, neighbor) entries; each close pair counts twice.
    pub neighbor_links: usize,
    /// Mean speed after integration.
    pub mean_speed: f32,
    /// Highest speed after integration.
    pub max_speed: f32,
    /// Time step actually integrated.
    pub capped_dt: f32,
}

/// A running flock: the agent store plus reusable per-tick buffers.
pub struct Flock<T = Vec3> {
    store: AgentStore<T>,
    config: FlockConfig,
    seed: u64,
    palette: Palette,
    state: RunState,
    tick_count: u64,
    grid: SpatialGrid,
    graph: NeighborGraph,
    snapshot: Vec<Kinematics>,
    forces: Vec<Vec3>,
}

impl<T> Flock<T> {
    fn assemble(store: AgentStore<T>, config: FlockConfig, seed: u64, palette: Palette) -> Self {
        let len = store.len();
        Self {
            store,
            config,
            seed,
            palette,
            state: RunState::Idle,
            tick_count: 0,
            grid: SpatialGrid::default(),
            graph: NeighborGraph::default(),
            snapshot: Vec::with_capacity(len),
            forces: Vec::with_capacity(len),
        }
    }

    /// Drive an existing store, e.g. hand-placed agents.
    pub fn from_store(store: AgentStore<T>, config: FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(store, config, 0, Palette::default()))
    }

    /// Advance every agent by one tick of `dt` seconds (capped at
    /// [`MAX_TICK_DELTA`](crate::config::MAX_TICK_DELTA)).
    ///
    /// A negative or non-finite `dt` is rejected and leaves the flock untouched.
    pub fn tick(&mut self, dt: f32) -> Result<TickStats, FlockError> {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("rejecting tick with delta time {}", dt);
            return Err(TickError::InvalidDeltaTime(dt).into());
        }
        let capped_dt = cap_delta(dt);

        self.store.snapshot_into(&mut self.snapshot);
        self.grid.rebuild(
            self.snapshot.iter().map(|k| k.position),
            self.config.neighbor_radius,
        )?;
        self.grid.neighbor_graph_into(&mut self.graph);

        compute_forces(&self.snapshot, &self.graph, &self.config, &mut self.forces);

        let max_speed = self.config.max_speed;
        for (agent, &force) in self.store.agents_mut().iter_mut().zip(&self.forces) {
            integrate(agent, force, capped_dt, max_speed);
        }

        self.tick_count += 1;
        self.state = RunState::Running;

        let stats = self.stats(capped_dt);
        log::trace!(
            "tick {}: {} agents, {} cells, {} links, mean speed {:.3}",
            stats.tick,
            stats.agent_count,
            stats.occupied_cells,
            stats.neighbor_links,
            stats.mean_speed
        );
        Ok(stats)
    }

    fn stats(&self, capped_dt: f32) -> TickStats {
        let (sum, max) = self
            .store
            .iter()
            .map(|a| a.velocity().length())
            .fold((0.0f32, 0.0f32), |(sum, max), s| (sum + s, max.max(s)));
        let count = self.store.len();
        TickStats {
            tick: self.tick_count,
            agent_count: count,
            occupied_cells: self.grid.occupied_cells(),
            neighbor_links: self.graph.total_links(),
            mean_speed: if count == 0 { 0.0 } else { sum / count as f32 },
            max_speed: max,
            capped_dt,
        }
    }

    /// Replace the tuning config. An invalid config is rejected and the old one kept.
    pub fn set_config(&mut self, config: FlockConfig) -> Result<(), ConfigError> {
        config.validate()?;
        log::debug!("flock config updated: {:?}", config);
        self.config = config;
        Ok(())
    }

    /// Rebuild the population as an `edge_length³` lattice with new tags.
    ///
    /// Uses this flock's seed, so the same edge length reproduces the same
    /// population. On error the current population is kept.
    pub fn restart_with<F>(&mut self, edge_length: i64, tag: F) -> Result<(), ConfigError>
    where
        F: FnMut(&mut SpawnContext) -> T,
    {
        let store = spawn::lattice_with(edge_length, self.config.max_speed, self.seed, tag)?;
        log::info!("restarted flock with {} agents", store.len());
        self.store = store;
        self.state = RunState::Idle;
        self.tick_count = 0;
        Ok(())
    }

    /// Contribution of each force to agent `index` given the current state.
    ///
    /// Builds a fresh grid, so this is meant for inspection, not per-tick use.
    pub fn force_breakdown(&self, index: usize) -> Result<Option<ForceBreakdown>, ConfigError> {
        let Some(agent) = self.store.get(index) else {
            return Ok(None);
        };
        let mut snapshot = Vec::new();
        self.store.snapshot_into(&mut snapshot);
        let grid = SpatialGrid::build(snapshot.iter().map(|k| k.position), self.config.neighbor_radius)?;
        let neighbors = grid.neighbors_of(index);
        Ok(Some(forces::breakdown(
            &agent.kinematics(),
            Neighborhood::new(&snapshot, &neighbors),
            &self.config,
        )))
    }

    /// The agent store.
    #[inline]
    pub fn agents(&self) -> &AgentStore<T> {
        &self.store
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.store.position(index)
    }

    pub fn velocity(&self, index: usize) -> Option<Vec3> {
        self.store.velocity(index)
    }

    pub fn facing(&self, index: usize) -> Option<Quat> {
        self.store.facing(index)
    }

    #[inline]
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Ticks completed since build or the last restart.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Neighbor lists computed during the last tick.
    #[inline]
    pub fn last_neighbors(&self) -> &NeighborGraph {
        &self.graph
    }

    /// Instance records coloured by `color`.
    pub fn instances_with(&self, mut color: impl FnMut(&T) -> Vec3) -> Vec<AgentInstance> {
        self.store
            .iter()
            .map(|agent| AgentInstance::new(agent, color(agent.tag())))
            .collect()
    }
}

impl Flock<Vec3> {
    /// Rebuild the population with colour tags from this flock's palette.
    pub fn restart(&mut self, edge_length: i64) -> Result<(), ConfigError> {
        let palette = self.palette;
        self.restart_with(edge_length, move |ctx| ctx.palette_color(palette))
    }

    /// Instance records coloured by each agent's tag.
    pub fn instances(&self) -> Vec<AgentInstance> {
        self.store.iter().map(AgentInstance::from).collect()
    }
}

/// Fill `out` with every agent's net force, read from `snapshot` only.
#[cfg(not(feature = "parallel"))]
fn compute_forces(
    snapshot: &[Kinematics],
    graph: &NeighborGraph,
    config: &FlockConfig,
    out: &mut Vec<Vec3>,
) {
    out.clear();
    out.extend(snapshot.iter().enumerate().map(|(i, subject)| {
        forces::net_force(subject, Neighborhood::new(snapshot, graph.neighbors_of(i)), config)
    }));
}

/// Fill `out` with every agent's net force, read from `snapshot` only.
///
/// Agents are independent, so the work splits across the rayon pool and
/// yields the same result as the sequential path.
#[cfg(feature = "parallel")]
fn compute_forces(
    snapshot: &[Kinematics],
    graph: &NeighborGraph,
    config: &FlockConfig,
    out: &mut Vec<Vec3>,
) {
    use rayon::prelude::*;

    snapshot
        .par_iter()
        .enumerate()
        .map(|(i, subject)| {
            forces::net_force(subject, Neighborhood::new(snapshot, graph.neighbors_of(i)), config)
        })
        .collect_into_vec(out);
}
