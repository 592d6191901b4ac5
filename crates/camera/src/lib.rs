//! Camera: orthographic camera state and the per-frame rig that steers it.
//!
//! Position follows the pointer around a fixed anchor; zoom follows the
//! viewport width with a one-time policy switch after the first frame.
//!
//! # Invariants
//! - Camera state is fully updated before the frame that reads it is drawn.
//! - The look-at point is fixed, never pointer-reactive.
//! - The mount phase changes exactly once, from `Initializing` to `Steady`.

mod rig;
mod state;

pub use rig::{CameraRig, MountPhase};
pub use state::{CameraState, CameraUniform};

pub fn crate_info() -> &'static str {
    "lumen-camera v0.1.0"
}
