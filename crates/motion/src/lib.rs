//! Motion: critically damped exponential smoothing of scalars and vectors.
//!
//! # Invariants
//! - The remaining gap shrinks by `exp(-dt / time_constant)` per call: no overshoot.
//! - Results depend on elapsed time only, never on frame rate.
//! - A time constant of zero snaps to the target.

mod damp;

pub use damp::{Dampable, Damped, damp, damp_vec3, decay_factor};

pub fn crate_info() -> &'static str {
    "lumen-motion v0.1.0"
}
