//! Force terms for the galaxy simulation.
//!
//! Three terms act on each system:
//! - **Spring**: along the line to each neighbour, proportional to how far the
//!   live separation is from the desired (load-time) separation.
//! - **Anti-gravity**: softened inverse-square repulsion between every pair of
//!   systems, neighbours included. Keeps the graph from collapsing.
//! - **Pin**: linear pull back to the original position, constrained systems only.
//!
//! Forces are computed from a snapshot of current positions only; nothing here
//! mutates a system.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::galaxy::{SimulationParams, System};

/// Separations below this are treated as coincident.
pub const COINCIDENT_EPSILON: f32 = 1e-6;

/// Added to the squared distance in the anti-gravity denominator.
pub const ANTI_GRAVITY_SOFTENING: f32 = 1e-2;

/// Unit vector pointing from `a` towards `b`, and the live distance between them.
///
/// Coincident systems fall back to the direction between their original
/// positions, then to the X axis ordered by index. The result is always
/// finite and `separation_axis(b, a)` is its exact negation.
pub fn separation_axis(a: &System, b: &System) -> (Vector3<f32>, f32) {
    let delta = b.position - a.position;
    let distance = delta.magnitude();
    if distance > COINCIDENT_EPSILON {
        return (delta / distance, distance);
    }

    let original = b.original_position - a.original_position;
    let original_distance = original.magnitude();
    if original_distance > COINCIDENT_EPSILON {
        return (original / original_distance, distance);
    }

    let sign = if a.id < b.id { 1.0 } else { -1.0 };
    (Vector3::new(sign, 0.0, 0.0), distance)
}

/// Spring force on `a` from its neighbour `b`.
pub fn spring_force(a: &System, b: &System, params: &SimulationParams) -> Vector3<f32> {
    let (axis, distance) = separation_axis(a, b);
    let stretch = distance - a.desired_distance_to(b);
    axis * (stretch * params.spring_stiffness())
}

/// Repulsion on `a` from `b`.
pub fn anti_gravity_force(a: &System, b: &System, params: &SimulationParams) -> Vector3<f32> {
    let (axis, distance) = separation_axis(a, b);
    let magnitude = params.anti_gravity_strength / (distance * distance + ANTI_GRAVITY_SOFTENING);
    -axis * magnitude
}

/// Pull of a constrained system back to its original position. Zero when unconstrained.
pub fn pin_force(a: &System, params: &SimulationParams) -> Vector3<f32> {
    if !a.constrained {
        return Vector3::zero();
    }
    (a.original_position - a.position) * params.pin_stiffness()
}

/// Compute the net force on every system into `forces`.
///
/// `forces` must have one slot per system. Every slot is overwritten.
pub fn accumulate_forces(
    systems: &[System],
    params: &SimulationParams,
    forces: &mut [Vector3<f32>],
) {
    debug_assert_eq!(systems.len(), forces.len());

    for (system, force) in systems.iter().zip(forces.iter_mut()) {
        let mut total = pin_force(system, params);
        for neighbour in &system.neighbours {
            total += spring_force(system, &systems[neighbour.slot()], params);
        }
        *force = total;
    }

    if params.anti_gravity_strength == 0.0 {
        return;
    }

    // Each pair once, applied with opposite signs.
    for i in 0..systems.len() {
        for j in (i + 1)..systems.len() {
            let push = anti_gravity_force(&systems[i], &systems[j], params);
            forces[i] += push;
            forces[j] -= push;
        }
    }
}
