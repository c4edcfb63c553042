//! Per-agent instance records for an external renderer.
//!
//! The layout is `#[repr(C)]` and `Pod`, so a slice can be handed to a GPU
//! upload with `bytemuck::cast_slice` without copying field by field.

use crate::agent::Agent;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Model transform and colour of one agent.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct AgentInstance {
    /// Column-major model matrix (rotation from facing, translation from position).
    pub model: [[f32; 4]; 4],
    /// RGB colour, 0.0-1.0.
    pub color: [f32; 3],
    /// Current speed, for speed-based shading.
    pub speed: f32,
}

impl AgentInstance {
    /// Build an instance record, colouring the agent with `color`.
    pub fn new<T>(agent: &Agent<T>, color: Vec3) -> Self {
        let model = Mat4::from_rotation_translation(agent.facing(), agent.position());
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
            speed: agent.velocity().length(),
        }
    }

    /// Model matrix as a glam type.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl From<&Agent<Vec3>> for AgentInstance {
    fn from(agent: &Agent<Vec3>) -> Self {
        AgentInstance::new(agent, *agent.tag())
    }
}
