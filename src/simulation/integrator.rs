//! Fixed-step integrator for the galaxy simulation.
//!
//! Semi-implicit Euler with two independent attenuations:
//!
//! ```text
//! v' = (v + F * dt) * (1 - drag)
//! p' = p + v' * dt * (1 - damping)
//! ```
//!
//! `drag` removes momentum that would carry into later steps; `damping` only
//! shortens the displacement applied in this step and leaves velocity alone.
//!
//! The pin on a constrained system is taken implicitly: its pull is evaluated
//! at the end-of-step position, which divides the new velocity by
//! `1 + (1 - drag) * k * dt * dt * (1 - damping)` for pin stiffness `k`. A stiff
//! pin then settles instead of overshooting, whatever `dt` the host uses.

use cgmath::Vector3;

use crate::galaxy::{SimulationParams, System};

/// Apply precomputed forces to every system.
///
/// `forces[i]` must have been computed from the positions the systems had
/// before this call. Each system's stored force is replaced by `forces[i]`.
pub fn integrate(
    systems: &mut [System],
    forces: &[Vector3<f32>],
    params: &SimulationParams,
    dt: f32,
) {
    debug_assert_eq!(systems.len(), forces.len());

    let retained_velocity = 1.0 - params.drag;
    let displacement_scale = dt * (1.0 - params.damping);
    let pin_divisor =
        1.0 + (retained_velocity * params.pin_stiffness() * dt * displacement_scale).max(0.0);

    for (system, &force) in systems.iter_mut().zip(forces) {
        system.force = force;
        let mut velocity = (system.velocity + force * dt) * retained_velocity;
        if system.constrained {
            velocity /= pin_divisor;
        }
        system.velocity = velocity;
        system.position += velocity * displacement_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Color;
    use crate::simulation::forces::pin_force;
    use crate::galaxy::SystemId;
    use cgmath::Zero;

    fn at_origin() -> System {
        System::new(
            SystemId(0),
            "S0".to_string(),
            Vector3::zero(),
            Color::WHITE,
            false,
            Vec::new(),
        )
    }

    fn params(drag: f32, damping: f32) -> SimulationParams {
        SimulationParams {
            drag,
            damping,
            ..Default::default()
        }
    }

    #[test]
    fn test_undamped_step() {
        let mut systems = vec![at_origin()];
        let forces = [Vector3::new(2.0, 0.0, 0.0)];

        integrate(&mut systems, &forces, &params(0.0, 0.0), 1.0);

        assert_eq!(systems[0].force(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(systems[0].velocity(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(systems[0].position(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_drag_attenuates_velocity() {
        let mut systems = vec![at_origin()];
        let forces = [Vector3::new(2.0, 0.0, 0.0)];

        integrate(&mut systems, &forces, &params(0.5, 0.0), 1.0);

        assert_eq!(systems[0].velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(systems[0].position(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_damping_shortens_displacement_only() {
        let mut systems = vec![at_origin()];
        let forces = [Vector3::new(2.0, 0.0, 0.0)];

        integrate(&mut systems, &forces, &params(0.0, 0.5), 1.0);

        // Velocity is untouched by damping; the position moves half as far.
        assert_eq!(systems[0].velocity(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(systems[0].position(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_stiff_pin_lands_on_original_position() {
        let mut pinned = at_origin();
        pinned.constrained = true;
        pinned.position = Vector3::new(1.0, 0.0, 0.0);
        let params = SimulationParams {
            drag: 0.0,
            damping: 0.0,
            pin_weight: 1.0e6,
            ..Default::default()
        };
        let forces = [pin_force(&pinned, &params)];
        let mut systems = vec![pinned];

        integrate(&mut systems, &forces, &params, 1.0);

        let x = systems[0].position().x;
        assert!(x.is_finite());
        assert!(x.abs() < 1e-3, "overshot to {x}");
        assert!(x >= 0.0);
    }

    #[test]
    fn test_pin_divisor_skips_unconstrained() {
        let mut systems = vec![at_origin()];
        let forces = [Vector3::new(2.0, 0.0, 0.0)];
        let params = SimulationParams {
            drag: 0.0,
            damping: 0.0,
            pin_weight: 1.0e6,
            ..Default::default()
        };

        integrate(&mut systems, &forces, &params, 1.0);

        assert_eq!(systems[0].position(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_dt_keeps_position() {
        let mut systems = vec![at_origin()];
        systems[0].velocity = Vector3::new(1.0, 1.0, 1.0);
        let forces = [Vector3::new(5.0, 0.0, 0.0)];

        integrate(&mut systems, &forces, &params(0.0, 0.0), 0.0);

        assert_eq!(systems[0].position(), Vector3::zero());
        assert_eq!(systems[0].force(), Vector3::new(5.0, 0.0, 0.0));
    }
}
