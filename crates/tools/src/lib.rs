//! Developer Tooling: read-only inspection of a running scene loop.
//!
//! # Invariants
//! - Tools never mutate the loop they inspect.

mod inspector;

pub use inspector::{LoopInspector, LoopSummary};

pub fn crate_info() -> &'static str {
    "lumen-tools v0.1.0"
}
