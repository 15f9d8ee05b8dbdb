//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries over system positions for:
//! - Nearest system (hit testing)
//! - Point-in-radius
//! - Box intersection

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::galaxy::SystemId;

/// A point in the spatial index with its system ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemPoint {
    pub id: SystemId,
    pub position: [f32; 3],
}

impl SystemPoint {
    pub fn new(id: SystemId, position: [f32; 3]) -> Self {
        Self { id, position }
    }
}

impl RTreeObject for SystemPoint {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for SystemPoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index over system positions.
///
/// Uses an R*-tree, bulk loaded from a position snapshot.
pub struct SpatialIndex {
    tree: RTree<SystemPoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Find the nearest system within a maximum distance.
    pub fn nearest_within(&self, point: [f32; 3], max_distance: f32) -> Option<SystemId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&point)
            .filter(|p| p.distance_2(&point) <= max_distance_sq)
            .map(|p| p.id)
    }

    /// Find all systems inside an axis-aligned box.
    pub fn in_box(&self, min: [f32; 3], max: [f32; 3]) -> Vec<SystemId> {
        let envelope = AABB::from_corners(min, max);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|p| p.id)
            .collect()
    }

    /// Find all systems within a radius of a point.
    pub fn in_radius(&self, point: [f32; 3], radius: f32) -> Vec<SystemId> {
        self.tree
            .locate_within_distance(point, radius * radius)
            .map(|p| p.id)
            .collect()
    }

    /// Rebuild the index from a list of (id, position) pairs.
    pub fn rebuild(&mut self, points: &[(SystemId, [f32; 3])]) {
        let system_points: Vec<_> = points
            .iter()
            .map(|&(id, position)| SystemPoint::new(id, position))
            .collect();

        self.tree = RTree::bulk_load(system_points);
    }

    /// Get the number of systems in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }
}
