//! Input: host pointer events reduced to one normalized snapshot per frame.
//!
//! # Invariants
//! - The engine only ever sees the latest snapshot, never raw events.
//! - An absent pointer reads as centered.

pub mod pointer;

pub use pointer::{PointerEvent, PointerTracker};

pub fn crate_info() -> &'static str {
    "lumen-input v0.1.0"
}
