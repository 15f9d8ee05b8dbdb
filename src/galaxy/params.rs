//! Simulation parameters.

use serde::{Deserialize, Serialize};

/// Tunable knobs for the force simulation.
///
/// Values are not range-checked. Negative weights or attenuations outside
/// `[0, 1]` are applied as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
    /// Fraction of each step's displacement that is suppressed (default: 0.1).
    pub damping: f32,
    /// Fraction of velocity lost every step (default: 0.3).
    pub drag: f32,
    /// Spring stiffness between neighbours (default: 1.0).
    pub neighbour_weight: f32,
    /// Stiffness of the pull back to the original position on constrained systems (default: 1.0).
    pub pin_weight: f32,
    /// Overall scale on the constraint terms: neighbour springs and pins (default: 1.0).
    pub constraint_weight: f32,
    /// Strength of the pairwise repulsion (default: 1.0).
    pub anti_gravity_strength: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            damping: 0.1,
            drag: 0.3,
            neighbour_weight: 1.0,
            pin_weight: 1.0,
            constraint_weight: 1.0,
            anti_gravity_strength: 1.0,
        }
    }
}

impl SimulationParams {
    /// Effective spring stiffness after the constraint scale.
    #[inline]
    pub fn spring_stiffness(&self) -> f32 {
        self.neighbour_weight * self.constraint_weight
    }

    /// Effective pin stiffness after the constraint scale.
    #[inline]
    pub fn pin_stiffness(&self) -> f32 {
        self.pin_weight * self.constraint_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: SimulationParams =
            serde_json::from_str(r#"{ "pinWeight": 20.0, "drag": 0.5 }"#).unwrap();
        assert_eq!(params.pin_weight, 20.0);
        assert_eq!(params.drag, 0.5);
        assert_eq!(params.damping, SimulationParams::default().damping);
        assert_eq!(params.anti_gravity_strength, 1.0);
    }

    #[test]
    fn test_constraint_weight_scales_springs_and_pins() {
        let params = SimulationParams {
            neighbour_weight: 2.0,
            pin_weight: 3.0,
            constraint_weight: 0.5,
            ..Default::default()
        };
        assert_eq!(params.spring_stiffness(), 1.0);
        assert_eq!(params.pin_stiffness(), 1.5);
    }
}
