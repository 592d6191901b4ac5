//! Shared types for the lumen scene engine: per-frame input context and
//! scene configuration.
//!
//! # Invariants
//! - Frame input is passed explicitly; nothing reads ambient or global state.
//! - A missing pointer is a centered pointer, never an error.

pub mod config;
pub mod types;

pub use config::{CameraSettings, ConfigError, JitterShape, SceneConfig, ShadowSettings};
pub use types::{FrameContext, PointerState, SceneId, Viewport};

pub fn crate_info() -> &'static str {
    "lumen-common v0.1.0"
}
