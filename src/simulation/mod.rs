//! Force computation and integration.
//!
//! A step is two phases: every force is computed from the pre-step positions
//! (`forces`), then every system is integrated (`integrator`). No force ever
//! sees a position that was already moved in the same step.

pub mod forces;
pub mod integrator;

pub use forces::{accumulate_forces, separation_axis};
pub use integrator::integrate;
