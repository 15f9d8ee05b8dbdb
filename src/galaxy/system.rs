//! Star system (graph node) and related types.
//!
//! Each system has:
//! - A stable index, assigned at load and never reused
//! - Its load-time position, kept for reset and as the spring reference
//! - Live position, velocity and last computed force
//! - A pinned ("constrained") flag and a display color
//! - Neighbour indices into the owning galaxy

use std::fmt;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::description::Color;

/// Slot of a system in its galaxy's arena.
///
/// Systems are never added or removed after load, so ids are exactly
/// `0..len` and index the arena directly. An id means nothing to a galaxy
/// other than the one that issued it. Ordering follows load order, which is
/// how undirected neighbour pairs pick their `(lower, higher)` orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemId(pub u32);

impl SystemId {
    /// The record index this id was loaded from.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single star system.
///
/// Fields are read-only outside the crate; the owning
/// [`Galaxy`](crate::Galaxy) is the only thing that mutates them.
#[derive(Debug, Clone)]
pub struct System {
    pub(crate) id: SystemId,
    pub(crate) name: String,
    pub(crate) original_position: Vector3<f32>,
    pub(crate) position: Vector3<f32>,
    pub(crate) velocity: Vector3<f32>,
    pub(crate) force: Vector3<f32>,
    pub(crate) color: Color,
    pub(crate) constrained: bool,
    pub(crate) neighbours: Vec<SystemId>,
}

impl System {
    pub(crate) fn new(
        id: SystemId,
        name: String,
        position: Vector3<f32>,
        color: Color,
        constrained: bool,
        neighbours: Vec<SystemId>,
    ) -> Self {
        Self {
            id,
            name,
            original_position: position,
            position,
            velocity: Vector3::zero(),
            force: Vector3::zero(),
            color,
            constrained,
            neighbours,
        }
    }

    #[inline]
    pub fn id(&self) -> SystemId {
        self.id
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.id.0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load-time position. Reset target and spring reference.
    #[inline]
    pub fn original_position(&self) -> Vector3<f32> {
        self.original_position
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    /// Force computed by the most recent step.
    #[inline]
    pub fn force(&self) -> Vector3<f32> {
        self.force
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Color as `[r, g, b, a]`.
    pub fn color_components(&self) -> [f32; 4] {
        self.color.components()
    }

    /// Whether the system is pinned to its original position.
    #[inline]
    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    pub fn neighbours(&self) -> &[SystemId] {
        &self.neighbours
    }

    pub fn has_neighbour(&self, other: SystemId) -> bool {
        self.neighbours.contains(&other)
    }

    /// Separation the springs aim for: distance between original positions.
    pub fn desired_distance_to(&self, other: &System) -> f32 {
        (other.original_position - self.original_position).magnitude()
    }

    /// Live separation between current positions.
    pub fn actual_distance_to(&self, other: &System) -> f32 {
        (other.position - self.position).magnitude()
    }

    pub(crate) fn reset(&mut self) {
        self.position = self.original_position;
        self.velocity = Vector3::zero();
        self.force = Vector3::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(id: u32, position: [f32; 3]) -> System {
        System::new(
            SystemId(id),
            format!("S{id}"),
            Vector3::from(position),
            Color::WHITE,
            false,
            Vec::new(),
        )
    }

    #[test]
    fn test_id_is_arena_slot() {
        let ids = [SystemId(2), SystemId(0), SystemId(1)];
        let mut sorted = ids;
        sorted.sort();
        assert_eq!(sorted.map(SystemId::slot), [0, 1, 2]);
        assert_eq!(SystemId(7).raw(), 7);
        assert_eq!(SystemId(7).to_string(), "#7");
    }

    #[test]
    fn test_new_system_at_rest() {
        let s = system(0, [1.0, 2.0, 3.0]);
        assert_eq!(s.position(), s.original_position());
        assert_eq!(s.velocity(), Vector3::zero());
        assert_eq!(s.force(), Vector3::zero());
        assert_eq!(s.color_components(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_distances() {
        let a = system(0, [0.0, 0.0, 0.0]);
        let mut b = system(1, [3.0, 4.0, 0.0]);

        assert_eq!(a.desired_distance_to(&b), 5.0);
        assert_eq!(b.desired_distance_to(&a), 5.0);

        b.position = Vector3::new(0.0, 0.0, 2.0);
        assert_eq!(a.actual_distance_to(&b), 2.0);
        // Desired distance ignores live positions
        assert_eq!(a.desired_distance_to(&b), 5.0);
    }

    #[test]
    fn test_reset_restores_load_state() {
        let mut s = system(0, [1.0, 1.0, 1.0]);
        s.position = Vector3::new(9.0, 9.0, 9.0);
        s.velocity = Vector3::new(1.0, 0.0, 0.0);
        s.force = Vector3::new(0.0, 1.0, 0.0);

        s.reset();
        assert_eq!(s.position(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(s.velocity(), Vector3::zero());
        assert_eq!(s.force(), Vector3::zero());
    }
}
