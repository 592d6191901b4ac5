//! Shadows: soft contact shadows from many hard shadows.
//!
//! Each tick renders one hard shadow from a light position jittered inside a
//! ball (or disc) around the nominal light, and folds it into a running blend
//! with weight `1 / target`. After `target` successful samples the blend is
//! frozen and reused unchanged.
//!
//! # Invariants
//! - `samples` counts successful blends only; a failed cast is retried, never skipped.
//! - `samples <= target`; frozen exactly when `samples == target`.
//! - A frozen buffer changes only through an explicit reset.

mod accumulator;
mod sampler;
mod term;

pub use accumulator::{
    AccumulationBuffer, AccumulatorState, CastError, LightSample, ShadowAccumulator,
    ShadowCaster, ShadowPass, ShadowStyle, TickOutcome,
};
pub use sampler::JitteredLightSampler;
pub use term::ShadowTerm;

pub fn crate_info() -> &'static str {
    "lumen-shadow v0.1.0"
}
