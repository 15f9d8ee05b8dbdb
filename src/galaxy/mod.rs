//! Galaxy data structures and operations.
//!
//! A galaxy is a fixed set of star systems stored in one vec and addressed
//! by [`SystemId`]. Neighbour relations are symmetric id lists, checked at
//! load by the loader.

mod engine;
mod loader;
mod observer;
mod params;
mod system;

pub use engine::Galaxy;
pub use loader::validate;
pub use observer::{GalaxyEvent, ObserverId};
pub use params::SimulationParams;
pub use system::{System, SystemId};
