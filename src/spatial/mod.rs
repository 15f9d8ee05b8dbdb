//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based spatial index for efficient
//! nearest-system and range queries over live positions.

mod rtree;

pub use rtree::SpatialIndex;
