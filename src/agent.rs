//! Per-agent state and the fixed-size agent store.
//!
//! Agents carry an opaque tag (a display colour by default) that the
//! simulation never reads. The store's length is fixed once built; changing
//! the population means building a new store.

use crate::integrator::facing;
use glam::{Quat, Vec3};

/// Position and velocity of one agent, copied out before forces are computed.
///
/// All force contributions in a tick read from a snapshot of these, so no
/// agent sees another agent's already-updated state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Kinematics {
    #[inline]
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }
}

/// One flocking agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent<T = Vec3> {
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    /// Derived from velocity at the end of every tick.
    pub(crate) facing: Quat,
    pub(crate) tag: T,
}

impl<T> Agent<T> {
    /// Create an agent; its facing is derived from `velocity`.
    pub fn new(position: Vec3, velocity: Vec3, tag: T) -> Self {
        Self {
            position,
            velocity,
            facing: facing(velocity),
            tag,
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Orientation facing along the direction of travel.
    #[inline]
    pub fn facing(&self) -> Quat {
        self.facing
    }

    /// The opaque identity tag.
    #[inline]
    pub fn tag(&self) -> &T {
        &self.tag
    }

    #[inline]
    pub fn kinematics(&self) -> Kinematics {
        Kinematics::new(self.position, self.velocity)
    }
}

/// The whole population, indexed by array position.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStore<T = Vec3> {
    agents: Vec<Agent<T>>,
}

impl<T> AgentStore<T> {
    /// Wrap a prebuilt set of agents. The length is fixed from here on.
    pub fn from_agents(agents: Vec<Agent<T>>) -> Self {
        Self { agents }
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Agent<T>> {
        self.agents.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent<T>> {
        self.agents.iter()
    }

    pub fn as_slice(&self) -> &[Agent<T>] {
        &self.agents
    }

    /// Position of agent `index`.
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.agents.get(index).map(Agent::position)
    }

    /// Velocity of agent `index`.
    pub fn velocity(&self, index: usize) -> Option<Vec3> {
        self.agents.get(index).map(Agent::velocity)
    }

    /// Facing of agent `index`.
    pub fn facing(&self, index: usize) -> Option<Quat> {
        self.agents.get(index).map(Agent::facing)
    }

    /// All current positions, in agent order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.agents.iter().map(Agent::position).collect()
    }

    /// Fill `out` with a position/velocity snapshot, reusing its allocation.
    pub(crate) fn snapshot_into(&self, out: &mut Vec<Kinematics>) {
        out.clear();
        out.extend(self.agents.iter().map(Agent::kinematics));
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent<T>] {
        &mut self.agents
    }
}

impl<'a, T> IntoIterator for &'a AgentStore<T> {
    type Item = &'a Agent<T>;
    type IntoIter = std::slice::Iter<'a, Agent<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
