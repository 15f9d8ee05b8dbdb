//! Galaxy Extruder - WASM Module
//!
//! Lays out a graph of star systems in 3D with a force-directed simulation.
//! Neighbouring systems are pulled towards their load-time separation, every
//! pair repels weakly, and pinned systems are held near where they started.
//! The core is plain Rust; [`GalaxyWasm`] exposes it to JavaScript hosts,
//! which own the timer that calls `step`.
//!
//! # Architecture
//!
//! - `description`: the record shape a galaxy is loaded from
//! - `galaxy`: systems, validation, parameters, step/jiggle/reset, observers
//! - `simulation`: force terms and the integrator
//! - `spatial`: R-tree spatial indexing for hit testing
//! - `rng`: the RANROT generator behind jiggle
//! - `export`: description, web-viewer and GraphViz output

use cgmath::Vector3;
use js_sys::{Float32Array, Function};
use wasm_bindgen::prelude::*;

pub mod description;
pub mod error;
mod export;
pub mod galaxy;
pub mod rng;
pub mod simulation;
mod spatial;

pub use description::{Color, GalaxyDescription, SystemRecord};
pub use error::{GalaxyError, GalaxyResult, StructureViolation};
pub use export::ViewerData;
pub use galaxy::{Galaxy, GalaxyEvent, ObserverId, SimulationParams, System, SystemId};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn galaxy_error(err: GalaxyError) -> JsError {
    JsError::new(&err.to_string())
}

fn serde_error(err: serde_wasm_bindgen::Error) -> JsError {
    JsError::new(&err.to_string())
}

/// Flatten one vector per system into `[x0, y0, z0, x1, ...]`.
fn flatten(galaxy: &Galaxy, field: impl Fn(&System) -> Vector3<f32>) -> Vec<f32> {
    let mut out = Vec::with_capacity(galaxy.len() * 3);
    for system in galaxy.systems() {
        let v = field(system);
        out.extend_from_slice(&[v.x, v.y, v.z]);
    }
    out
}

/// Main entry point for web hosts.
///
/// Wraps a [`Galaxy`] and exposes it to JavaScript as `Galaxy`.
#[wasm_bindgen(js_name = Galaxy)]
pub struct GalaxyWasm {
    galaxy: Galaxy,
}

#[wasm_bindgen(js_class = Galaxy)]
impl GalaxyWasm {
    /// Build a galaxy from an already-parsed description object.
    #[wasm_bindgen(js_name = fromDescription)]
    pub fn from_description(value: JsValue) -> Result<GalaxyWasm, JsError> {
        let description: GalaxyDescription =
            serde_wasm_bindgen::from_value(value).map_err(serde_error)?;
        let galaxy = Galaxy::from_description(&description).map_err(galaxy_error)?;
        Ok(Self { galaxy })
    }

    /// Build a galaxy from JSON text.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(text: &str) -> Result<GalaxyWasm, JsError> {
        let galaxy = Galaxy::from_json(text).map_err(galaxy_error)?;
        Ok(Self { galaxy })
    }

    /// Get the number of systems.
    #[wasm_bindgen(getter, js_name = systemCount)]
    pub fn system_count(&self) -> u32 {
        self.galaxy.len() as u32
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    pub fn step(&mut self, dt: f32) {
        self.galaxy.step(dt);
    }

    pub fn jiggle(&mut self, scale: f32) {
        self.galaxy.jiggle(scale);
    }

    pub fn reset(&mut self) {
        self.galaxy.reset();
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    #[wasm_bindgen(getter)]
    pub fn damping(&self) -> f32 {
        self.galaxy.damping()
    }

    #[wasm_bindgen(setter)]
    pub fn set_damping(&mut self, value: f32) {
        self.galaxy.set_damping(value);
    }

    #[wasm_bindgen(getter)]
    pub fn drag(&self) -> f32 {
        self.galaxy.drag()
    }

    #[wasm_bindgen(setter)]
    pub fn set_drag(&mut self, value: f32) {
        self.galaxy.set_drag(value);
    }

    #[wasm_bindgen(getter = neighbourWeight)]
    pub fn neighbour_weight(&self) -> f32 {
        self.galaxy.neighbour_weight()
    }

    #[wasm_bindgen(setter = neighbourWeight)]
    pub fn set_neighbour_weight(&mut self, value: f32) {
        self.galaxy.set_neighbour_weight(value);
    }

    #[wasm_bindgen(getter = pinWeight)]
    pub fn pin_weight(&self) -> f32 {
        self.galaxy.pin_weight()
    }

    #[wasm_bindgen(setter = pinWeight)]
    pub fn set_pin_weight(&mut self, value: f32) {
        self.galaxy.set_pin_weight(value);
    }

    #[wasm_bindgen(getter = constraintWeight)]
    pub fn constraint_weight(&self) -> f32 {
        self.galaxy.constraint_weight()
    }

    #[wasm_bindgen(setter = constraintWeight)]
    pub fn set_constraint_weight(&mut self, value: f32) {
        self.galaxy.set_constraint_weight(value);
    }

    #[wasm_bindgen(getter = antiGravityStrength)]
    pub fn anti_gravity_strength(&self) -> f32 {
        self.galaxy.anti_gravity_strength()
    }

    #[wasm_bindgen(setter = antiGravityStrength)]
    pub fn set_anti_gravity_strength(&mut self, value: f32) {
        self.galaxy.set_anti_gravity_strength(value);
    }

    /// All parameters as a plain object.
    pub fn parameters(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.galaxy.parameters()).map_err(serde_error)
    }

    /// Replace parameters from a (possibly partial) object. Missing fields take defaults.
    #[wasm_bindgen(js_name = setParameters)]
    pub fn set_parameters(&mut self, value: JsValue) -> Result<(), JsError> {
        let params: SimulationParams = serde_wasm_bindgen::from_value(value).map_err(serde_error)?;
        self.galaxy.set_parameters(params);
        Ok(())
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Live positions as [x0, y0, z0, x1, ...].
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(&flatten(&self.galaxy, System::position)[..])
    }

    #[wasm_bindgen(js_name = getOriginalPositions)]
    pub fn get_original_positions(&self) -> Float32Array {
        Float32Array::from(&flatten(&self.galaxy, System::original_position)[..])
    }

    #[wasm_bindgen(js_name = getVelocities)]
    pub fn get_velocities(&self) -> Float32Array {
        Float32Array::from(&flatten(&self.galaxy, System::velocity)[..])
    }

    /// Forces from the most recent step, for drawing force vectors.
    #[wasm_bindgen(js_name = getForces)]
    pub fn get_forces(&self) -> Float32Array {
        Float32Array::from(&flatten(&self.galaxy, System::force)[..])
    }

    /// Colors as [r0, g0, b0, a0, r1, ...].
    #[wasm_bindgen(js_name = getColors)]
    pub fn get_colors(&self) -> Float32Array {
        let colors: Vec<f32> = self
            .galaxy
            .systems()
            .iter()
            .flat_map(System::color_components)
            .collect();
        Float32Array::from(&colors[..])
    }

    /// Neighbour pairs as [a0, b0, a1, b1, ...], each pair once.
    #[wasm_bindgen(js_name = getNeighbourPairs)]
    pub fn get_neighbour_pairs(&self) -> Vec<u32> {
        self.galaxy
            .neighbour_pairs()
            .into_iter()
            .flat_map(|(a, b)| [a.raw(), b.raw()])
            .collect()
    }

    // =========================================================================
    // Systems
    // =========================================================================

    #[wasm_bindgen(js_name = systemName)]
    pub fn system_name(&self, index: u32) -> Option<String> {
        self.galaxy
            .system(SystemId(index))
            .map(|s| s.name().to_string())
    }

    #[wasm_bindgen(js_name = isConstrained)]
    pub fn is_constrained(&self, index: u32) -> bool {
        self.galaxy
            .system(SystemId(index))
            .is_some_and(System::is_constrained)
    }

    /// Move one system. Returns false for an unknown index.
    #[wasm_bindgen(js_name = setSystemPosition)]
    pub fn set_system_position(&mut self, index: u32, x: f32, y: f32, z: f32) -> bool {
        self.galaxy
            .set_position(SystemId(index), Vector3::new(x, y, z))
    }

    #[wasm_bindgen(js_name = desiredDistance)]
    pub fn desired_distance(&self, a: u32, b: u32) -> Option<f32> {
        self.galaxy.desired_distance(SystemId(a), SystemId(b))
    }

    #[wasm_bindgen(js_name = actualDistance)]
    pub fn actual_distance(&self, a: u32, b: u32) -> Option<f32> {
        self.galaxy.actual_distance(SystemId(a), SystemId(b))
    }

    #[wasm_bindgen(js_name = hasNeighbour)]
    pub fn has_neighbour(&self, a: u32, b: u32) -> bool {
        self.galaxy.has_neighbour(SystemId(a), SystemId(b))
    }

    /// Find the nearest system within a maximum distance of a point.
    #[wasm_bindgen(js_name = findNearestSystem)]
    pub fn find_nearest_system(&self, x: f32, y: f32, z: f32, max_distance: f32) -> Option<u32> {
        self.galaxy
            .find_nearest_system(Vector3::new(x, y, z), max_distance)
            .map(SystemId::raw)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// The current arrangement as description JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        self.galaxy.to_description().to_json().map_err(galaxy_error)
    }

    /// `{ positions, colors, neighbours }` for the web viewer.
    #[wasm_bindgen(js_name = toViewerData)]
    pub fn to_viewer_data(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.galaxy.to_viewer_data()).map_err(serde_error)
    }

    #[wasm_bindgen(js_name = debugGraphviz)]
    pub fn debug_graphviz(&self) -> String {
        self.galaxy.debug_graphviz()
    }

    // =========================================================================
    // Change Notification
    // =========================================================================

    /// Call `callback(eventName)` after every mutating operation.
    ///
    /// Returns an id for `removeChangeListener`.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) -> u32 {
        let id = self.galaxy.subscribe(move |_, event| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event.name())) {
                web_sys::console::error_1(&err);
            }
        });
        id.0
    }

    #[wasm_bindgen(js_name = removeChangeListener)]
    pub fn remove_change_listener(&mut self, id: u32) -> bool {
        self.galaxy.unsubscribe(ObserverId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_interleaves_components() {
        let galaxy = Galaxy::from_description(&GalaxyDescription::new(vec![
            SystemRecord::new("A", [1.0, 2.0, 3.0]),
            SystemRecord::new("B", [4.0, 5.0, 6.0]),
        ]))
        .unwrap();

        assert_eq!(
            flatten(&galaxy, System::position),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
        assert_eq!(flatten(&galaxy, System::velocity), vec![0.0; 6]);
    }
}
