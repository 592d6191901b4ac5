//! Frame Kernel: one synchronous tick per host frame.
//!
//! # Invariants
//! - Within a tick: camera first, then at most one shadow sample, then the draw.
//! - Ticks never overlap; nothing runs between ticks.
//! - Every mutation is recorded as a [`FrameEvent`].

pub mod scene_loop;

pub use scene_loop::{FrameError, FrameEvent, SceneRenderLoop};

pub fn crate_info() -> &'static str {
    "lumen-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
