//! The four steering contributions.
//!
//! Every function here is pure: it reads a subject's pre-tick snapshot and
//! its neighbors' snapshots and returns a force vector. Nothing mutates an
//! agent; the driver sums the results and hands them to the integrator.
//!
//! Zero-length vectors are normalized to zero, and coincident agents are
//! skipped by separation, so no contribution ever produces NaN or infinity
//! from finite input.

use crate::agent::Kinematics;
use crate::config::{FlockConfig, BOUNDARY_FORCE};
use glam::Vec3;

/// Push toward the origin that grows without bound near the outer sphere.
///
/// `distance_from_edge = max(outer_radius - |p|, f32::EPSILON)`; magnitude is
/// `BOUNDARY_FORCE / distance_from_edge * scaling` along `-p`. An agent exactly
/// at the origin has no direction to be pushed in and receives zero.
pub fn boundary_containment(subject: &Kinematics, outer_radius: f32, scaling: f32) -> Vec3 {
    let distance_from_center = subject.position.length();
    let distance_from_edge = (outer_radius - distance_from_center).max(f32::EPSILON);
    let magnitude = BOUNDARY_FORCE / distance_from_edge;
    (-subject.position).normalize_or_zero() * (magnitude * scaling)
}

/// Steer along the neighbors' summed velocity, normalized.
///
/// Zero neighbors, or velocities that cancel out, contribute nothing.
pub fn alignment<'a>(neighbors: impl IntoIterator<Item = &'a Kinematics>, scaling: f32) -> Vec3 {
    let heading: Vec3 = neighbors.into_iter().map(|n| n.velocity).sum();
    heading.normalize_or_zero() * scaling
}

/// Steer from the subject's position toward the neighbors' mean *velocity*.
///
/// The average neighbor velocity stands in for a center of mass; this is the
/// flock's established behavior and is kept as is. Zero neighbors contribute
/// nothing.
pub fn cohesion<'a>(
    subject: &Kinematics,
    neighbors: impl IntoIterator<Item = &'a Kinematics>,
    scaling: f32,
) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for neighbor in neighbors {
        sum += neighbor.velocity;
        count += 1;
    }
    if count == 0 {
        return Vec3::ZERO;
    }
    let center = sum / count as f32;
    (center - subject.position).normalize_or_zero() * scaling
}

/// Repulsion from each neighbor: `(p - q) * (scaling / |p - q|)`, summed.
///
/// Neighbors at the subject's exact position have no defined direction and
/// are skipped.
pub fn separation<'a>(
    subject: &Kinematics,
    neighbors: impl IntoIterator<Item = &'a Kinematics>,
    scaling: f32,
) -> Vec3 {
    let mut sum = Vec3::ZERO;
    for neighbor in neighbors {
        let offset = subject.position - neighbor.position;
        let inverse_distance = 1.0 / offset.length();
        if !inverse_distance.is_finite() {
            continue;
        }
        sum += offset * (inverse_distance * scaling);
    }
    sum
}

/// Borrowed view of one agent's neighbors inside a tick snapshot.
#[derive(Clone, Copy, Debug)]
pub struct Neighborhood<'a> {
    bodies: &'a [Kinematics],
    indices: &'a [usize],
}

impl<'a> Neighborhood<'a> {
    /// `indices` must all be valid positions in `bodies`.
    pub fn new(bodies: &'a [Kinematics], indices: &'a [usize]) -> Self {
        Self { bodies, indices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Kinematics> + Clone + 'a {
        let bodies = self.bodies;
        self.indices.iter().map(move |&i| &bodies[i])
    }
}

/// Each contribution to one agent's net force, kept separate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceBreakdown {
    pub boundary: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub separation: Vec3,
}

impl ForceBreakdown {
    /// Net force, summed in the order boundary, alignment, cohesion, separation.
    #[inline]
    pub fn total(&self) -> Vec3 {
        let mut force = Vec3::ZERO;
        force += self.boundary;
        force += self.alignment;
        force += self.cohesion;
        force += self.separation;
        force
    }
}

/// Compute all four contributions for `subject`.
pub fn breakdown(
    subject: &Kinematics,
    neighbors: Neighborhood<'_>,
    config: &FlockConfig,
) -> ForceBreakdown {
    ForceBreakdown {
        boundary: boundary_containment(
            subject,
            config.outer_boundary_radius,
            config.outer_bounds_force_scaling,
        ),
        alignment: alignment(neighbors.iter(), config.alignment_force_scaling),
        cohesion: cohesion(subject, neighbors.iter(), config.cohesion_force_scaling),
        separation: separation(subject, neighbors.iter(), config.separation_force_scaling),
    }
}

/// Net force on `subject`.
#[inline]
pub fn net_force(subject: &Kinematics, neighbors: Neighborhood<'_>, config: &FlockConfig) -> Vec3 {
    breakdown(subject, neighbors, config).total()
}
