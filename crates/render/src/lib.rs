//! Rendering Adapter: the capability set the frame loop draws through.
//!
//! # Invariants
//! - The renderer only reads camera and shadow state; it never mutates them.
//! - The engine never issues draw calls itself; it hands state to a [`SceneRenderer`].
//!
//! # Backends
//! [`DebugTextRenderer`] produces a text summary per frame and casts hard
//! shadows on the CPU. The trait is stable; a GPU backend slots in without
//! changing the loop.

mod raster;
mod renderer;
mod scene;

pub use raster::cast_hard_shadow;
pub use renderer::{DebugTextRenderer, RenderError, SceneRenderer};
pub use scene::{Occluder, SceneLayout};

pub fn crate_info() -> &'static str {
    "lumen-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
