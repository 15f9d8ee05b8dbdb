//! Galaxy - the simulated graph of star systems.
//!
//! The Galaxy owns every system in a single `Vec`, indexed by [`SystemId`].
//! Neighbour relations are stored as ids into that vec, so systems never
//! own or borrow each other. The set of systems is fixed at load.

use std::cell::{Cell, RefCell};
use std::fmt;

use cgmath::{Vector3, Zero};
use rand::Rng;

use super::loader;
use super::observer::{GalaxyEvent, ObserverId, Observers};
use super::params::SimulationParams;
use super::system::{System, SystemId};
use crate::description::GalaxyDescription;
use crate::error::GalaxyResult;
use crate::rng::{DEFAULT_SEED, RanRot};
use crate::simulation;
use crate::spatial::SpatialIndex;

/// The simulated galaxy.
///
/// This struct manages:
/// - The systems and their neighbour topology
/// - Simulation parameters
/// - The jiggle PRNG stream
/// - Spatial index for hit testing
/// - Change observers
///
/// Not `Sync`: a host that steps on one thread and reads on another must
/// put the whole galaxy behind one lock.
pub struct Galaxy {
    systems: Vec<System>,

    params: SimulationParams,

    /// Seed the PRNG started from.
    seed: u64,

    rng: RanRot,

    /// Scratch buffer for the force phase of a step.
    forces: Vec<Vector3<f32>>,

    /// Spatial index over live positions, rebuilt lazily.
    spatial: RefCell<SpatialIndex>,

    /// Whether the spatial index needs rebuilding.
    spatial_dirty: Cell<bool>,

    observers: Observers,
}

impl Galaxy {
    /// Build a galaxy from a structural description.
    ///
    /// Fails with [`GalaxyError::StructureInvalid`](crate::GalaxyError::StructureInvalid)
    /// if any neighbour index is out of range, any neighbour pair is one-sided,
    /// or any system lists itself.
    pub fn from_description(description: &GalaxyDescription) -> GalaxyResult<Self> {
        let systems = loader::build_systems(description)
            .inspect_err(|err| log::warn!("rejected galaxy description: {err}"))?;
        let seed = description.seed.unwrap_or(DEFAULT_SEED);

        let galaxy = Self {
            forces: vec![Vector3::zero(); systems.len()],
            systems,
            params: SimulationParams::default(),
            seed,
            rng: RanRot::new(seed),
            spatial: RefCell::new(SpatialIndex::new()),
            spatial_dirty: Cell::new(true),
            observers: Observers::default(),
        };

        log::debug!(
            "loaded galaxy: {} systems, {} neighbour pairs, seed {:#x}",
            galaxy.len(),
            galaxy.edge_count(),
            seed
        );
        Ok(galaxy)
    }

    /// Decode a JSON description and build a galaxy from it.
    pub fn from_json(text: &str) -> GalaxyResult<Self> {
        Self::from_description(&GalaxyDescription::from_json(text)?)
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    /// Get the number of systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// All systems, in index order.
    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn system(&self, id: SystemId) -> Option<&System> {
        self.systems.get(id.slot())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Every neighbour pair once, as `(lower, higher)`.
    pub fn neighbour_pairs(&self) -> Vec<(SystemId, SystemId)> {
        self.systems
            .iter()
            .flat_map(|system| {
                system
                    .neighbours
                    .iter()
                    .filter(move |&&n| system.id < n)
                    .map(move |&n| (system.id, n))
            })
            .collect()
    }

    /// Get the number of undirected neighbour pairs.
    pub fn edge_count(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.neighbours.iter().filter(|&&n| s.id < n).count())
            .sum()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Distance between the original positions of `a` and `b`.
    pub fn desired_distance(&self, a: SystemId, b: SystemId) -> Option<f32> {
        Some(self.system(a)?.desired_distance_to(self.system(b)?))
    }

    /// Distance between the live positions of `a` and `b`.
    pub fn actual_distance(&self, a: SystemId, b: SystemId) -> Option<f32> {
        Some(self.system(a)?.actual_distance_to(self.system(b)?))
    }

    pub fn has_neighbour(&self, a: SystemId, b: SystemId) -> bool {
        self.system(a).is_some_and(|s| s.has_neighbour(b))
    }

    /// Get the bounding box of all live positions.
    pub fn bounds(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let first = self.systems.first()?.position;
        let bounds = self.systems.iter().skip(1).fold((first, first), |(min, max), s| {
            let p = s.position;
            (
                Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(bounds)
    }

    /// Find the system nearest to `point`, if one lies within `max_distance`.
    pub fn find_nearest_system(&self, point: Vector3<f32>, max_distance: f32) -> Option<SystemId> {
        self.ensure_spatial_index_up_to_date();
        self.spatial.borrow().nearest_within(point.into(), max_distance)
    }

    /// Find all systems within `radius` of `point`.
    pub fn systems_within(&self, point: Vector3<f32>, radius: f32) -> Vec<SystemId> {
        self.ensure_spatial_index_up_to_date();
        let mut found = self.spatial.borrow().in_radius(point.into(), radius);
        found.sort_unstable();
        found
    }

    /// Find all systems inside the box spanned by `min` and `max`.
    pub fn systems_in_box(&self, min: Vector3<f32>, max: Vector3<f32>) -> Vec<SystemId> {
        self.ensure_spatial_index_up_to_date();
        let mut found = self.spatial.borrow().in_box(min.into(), max.into());
        found.sort_unstable();
        found
    }

    fn ensure_spatial_index_up_to_date(&self) {
        if !self.spatial_dirty.get() {
            return;
        }
        let points: Vec<(SystemId, [f32; 3])> = self
            .systems
            .iter()
            .map(|s| (s.id, s.position.into()))
            .collect();
        let mut spatial = self.spatial.borrow_mut();
        spatial.rebuild(&points);
        log::trace!("rebuilt spatial index over {} systems", spatial.len());
        self.spatial_dirty.set(false);
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub fn parameters(&self) -> SimulationParams {
        self.params
    }

    pub fn set_parameters(&mut self, params: SimulationParams) {
        self.params = params;
        self.notify(GalaxyEvent::ParametersChanged);
    }

    pub fn damping(&self) -> f32 {
        self.params.damping
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.set_parameters(SimulationParams { damping, ..self.params });
    }

    pub fn drag(&self) -> f32 {
        self.params.drag
    }

    pub fn set_drag(&mut self, drag: f32) {
        self.set_parameters(SimulationParams { drag, ..self.params });
    }

    pub fn neighbour_weight(&self) -> f32 {
        self.params.neighbour_weight
    }

    pub fn set_neighbour_weight(&mut self, neighbour_weight: f32) {
        self.set_parameters(SimulationParams {
            neighbour_weight,
            ..self.params
        });
    }

    pub fn pin_weight(&self) -> f32 {
        self.params.pin_weight
    }

    pub fn set_pin_weight(&mut self, pin_weight: f32) {
        self.set_parameters(SimulationParams { pin_weight, ..self.params });
    }

    pub fn constraint_weight(&self) -> f32 {
        self.params.constraint_weight
    }

    pub fn set_constraint_weight(&mut self, constraint_weight: f32) {
        self.set_parameters(SimulationParams {
            constraint_weight,
            ..self.params
        });
    }

    pub fn anti_gravity_strength(&self) -> f32 {
        self.params.anti_gravity_strength
    }

    pub fn set_anti_gravity_strength(&mut self, anti_gravity_strength: f32) {
        self.set_parameters(SimulationParams {
            anti_gravity_strength,
            ..self.params
        });
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by one step of `dt`.
    ///
    /// All forces are computed from the positions before the step, then every
    /// system is integrated.
    pub fn step(&mut self, dt: f32) {
        simulation::accumulate_forces(&self.systems, &self.params, &mut self.forces);
        simulation::integrate(&mut self.systems, &self.forces, &self.params, dt);
        self.spatial_dirty.set(true);

        log::trace!("stepped {} systems by {dt}", self.systems.len());
        self.notify(GalaxyEvent::Stepped);
    }

    /// Displace every system by a pseudorandom offset in `[-scale, scale)` per axis.
    ///
    /// Velocities, forces and topology are untouched. Offsets are drawn in
    /// index order (x, y, z per system) from the galaxy's own PRNG stream.
    pub fn jiggle(&mut self, scale: f32) {
        for system in &mut self.systems {
            let offset = Vector3::new(
                self.rng.gen_range(-1.0f32..1.0),
                self.rng.gen_range(-1.0f32..1.0),
                self.rng.gen_range(-1.0f32..1.0),
            );
            system.position += offset * scale;
        }
        self.spatial_dirty.set(true);

        log::debug!("jiggled {} systems with scale {scale}", self.systems.len());
        self.notify(GalaxyEvent::Jiggled);
    }

    /// Put every system back at its load-time position, at rest.
    ///
    /// Parameters, topology and the PRNG stream are left alone.
    pub fn reset(&mut self) {
        for system in &mut self.systems {
            system.reset();
        }
        self.spatial_dirty.set(true);

        log::debug!("reset {} systems", self.systems.len());
        self.notify(GalaxyEvent::Reset);
    }

    /// Move a single system, e.g. when a view drags it.
    ///
    /// Returns false if `id` is not in this galaxy.
    pub fn set_position(&mut self, id: SystemId, position: Vector3<f32>) -> bool {
        let Some(system) = self.systems.get_mut(id.slot()) else {
            return false;
        };
        system.position = position;
        self.spatial_dirty.set(true);
        self.notify(GalaxyEvent::SystemMoved(id));
        true
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Register a callback run after every mutating operation.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&Galaxy, GalaxyEvent) + 'static,
    {
        self.observers.add(Box::new(callback))
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, event: GalaxyEvent) {
        if self.observers.is_empty() {
            return;
        }
        // Callbacks get a shared borrow of the galaxy, so the registry has to
        // be out of it while they run.
        let mut observers = std::mem::take(&mut self.observers);
        observers.notify(self, event);
        self.observers = observers;
    }
}

impl fmt::Debug for Galaxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Galaxy")
            .field("systems", &self.systems.len())
            .field("params", &self.params)
            .field("seed", &self.seed)
            .field("observers", &self.observers)
            .finish()
    }
}
