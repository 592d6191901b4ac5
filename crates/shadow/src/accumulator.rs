use glam::Vec3;
use lumen_common::ShadowSettings;
use serde::Serialize;

use crate::sampler::JitteredLightSampler;
use crate::term::ShadowTerm;

/// One jittered light position. Consumed by exactly one successful blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSample {
    /// Displacement from the nominal light position, within the jitter radius.
    pub offset: Vec3,
    pub position: Vec3,
    /// Contribution to the blended term, `1 / target`.
    pub weight: f32,
}

/// Everything a caster needs to render one hard-shadow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPass {
    pub light_position: Vec3,
    /// Point the directional light is aimed at.
    pub light_target: Vec3,
    /// Extent of the light's orthographic frustum.
    pub size: f32,
    pub resolution: u32,
    pub ground_extent: f32,
}

/// Why a shadow pass produced nothing usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("shadow pass failed: {0}")]
    Failed(String),
    #[error("shadow pass returned resolution {actual}, expected {expected}")]
    ResolutionMismatch { expected: u32, actual: u32 },
}

/// Renders a hard shadow for one light position. Implemented by the external renderer.
pub trait ShadowCaster {
    fn cast(&mut self, pass: &ShadowPass) -> Result<ShadowTerm, CastError>;
}

/// How the blended term is composited over the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    /// Strength of the shadow relative to the unshadowed ground.
    pub opacity: f32,
    /// Lit fraction at and above which a texel is fully transparent.
    pub alpha_test: f32,
    pub color: [f32; 3],
    pub color_blend: f32,
}

impl From<&ShadowSettings> for ShadowStyle {
    fn from(s: &ShadowSettings) -> Self {
        Self {
            opacity: s.opacity,
            alpha_test: s.alpha_test,
            color: s.color,
            color_blend: s.color_blend,
        }
    }
}

/// Running weighted blend of shadow samples.
///
/// `samples <= target` always; once `samples == target` the buffer is frozen
/// until [`ShadowAccumulator::reset`].
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    term: ShadowTerm,
    samples: u32,
    target: u32,
    frozen: bool,
    weight_sum: f64,
}

impl AccumulationBuffer {
    pub fn new(resolution: u32, target: u32) -> Self {
        Self {
            term: ShadowTerm::new(resolution),
            samples: 0,
            target: target.max(1),
            frozen: false,
            weight_sum: 0.0,
        }
    }

    pub fn term(&self) -> &ShadowTerm {
        &self.term
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Sum of the weights blended so far. Reaches 1.0 when frozen.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    pub fn progress(&self) -> f32 {
        self.samples as f32 / self.target as f32
    }

    fn blend(&mut self, sample: &ShadowTerm, weight: f32) {
        self.term.add_scaled(sample, weight);
        self.weight_sum += weight as f64;
        self.samples += 1;
        if self.samples >= self.target {
            self.frozen = true;
        }
    }

    fn reset(&mut self) {
        self.term.clear();
        self.samples = 0;
        self.frozen = false;
        self.weight_sum = 0.0;
    }

    /// Occlusion at a texel, normalised by the weight blended so far.
    ///
    /// While accumulating this shows the full-strength (noisy) estimate rather
    /// than a term that fades in. Texels outside the grid are lit.
    pub fn occlusion(&self, x: u32, y: u32) -> f32 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let Some(texel) = self.term.get(x, y) else {
            return 0.0;
        };
        (texel as f64 / self.weight_sum).clamp(0.0, 1.0) as f32
    }

    /// Composite every texel to straight RGBA, row-major.
    pub fn resolve(&self, style: &ShadowStyle) -> Vec<[f32; 4]> {
        let res = self.term.resolution();
        let mut out = Vec::with_capacity(self.term.texels().len());
        for y in 0..res {
            for x in 0..res {
                out.push(composite(self.occlusion(x, y), style));
            }
        }
        out
    }
}

/// Shade one texel: alpha falls to zero once the lit fraction reaches `alpha_test`.
fn composite(occlusion: f32, style: &ShadowStyle) -> [f32; 4] {
    let lit = 1.0 - occlusion;
    let alpha = ((1.0 - lit / style.alpha_test).max(0.0) * style.opacity).clamp(0.0, 1.0);
    let tint = lit * style.color_blend;
    [
        (style.color[0] * tint).clamp(0.0, 1.0),
        (style.color[1] * tint).clamp(0.0, 1.0),
        (style.color[2] * tint).clamp(0.0, 1.0),
        alpha,
    ]
}

/// Observable state of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccumulatorState {
    Accumulating,
    Frozen,
}

/// Result of one [`ShadowAccumulator::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A sample was blended. `frozen` is true on the tick that reached the target.
    Blended { samples: u32, frozen: bool },
    /// The cast failed. The same light sample is retried next tick.
    Retry { reason: String },
    /// Frozen; nothing was done.
    Idle,
}

/// Stochastic area-light shadows: one jittered hard shadow per tick, averaged.
#[derive(Debug, Clone)]
pub struct ShadowAccumulator {
    settings: ShadowSettings,
    sampler: JitteredLightSampler,
    buffer: AccumulationBuffer,
    pending: Option<LightSample>,
}

impl ShadowAccumulator {
    pub fn new(settings: ShadowSettings) -> Self {
        let sampler = JitteredLightSampler::new(settings.jitter_shape, settings.seed);
        let buffer = AccumulationBuffer::new(settings.resolution, settings.target_samples);
        tracing::debug!(
            shape = ?sampler.shape(),
            seed = settings.seed,
            target = buffer.target(),
            resolution = settings.resolution,
            "shadow accumulator created"
        );
        Self {
            settings,
            sampler,
            buffer,
            pending: None,
        }
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    pub fn state(&self) -> AccumulatorState {
        if self.buffer.is_frozen() {
            AccumulatorState::Frozen
        } else {
            AccumulatorState::Accumulating
        }
    }

    pub fn style(&self) -> ShadowStyle {
        ShadowStyle::from(&self.settings)
    }

    /// Light sample awaiting a retry after a failed cast.
    pub fn pending(&self) -> Option<&LightSample> {
        self.pending.as_ref()
    }

    /// Move the nominal light. The frozen buffer stays as it is until [`ShadowAccumulator::reset`].
    pub fn set_light_position(&mut self, position: Vec3) {
        self.settings.light_position = position;
    }

    /// Discard everything accumulated and start sampling again.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.pending = None;
        tracing::debug!("shadow accumulation reset");
    }

    fn next_sample(&mut self) -> LightSample {
        let nominal = self.settings.light_position;
        let position = self.sampler.sample(nominal, self.settings.jitter_radius);
        LightSample {
            offset: position - nominal,
            position,
            weight: 1.0 / self.buffer.target() as f32,
        }
    }

    fn pass_for(&self, sample: &LightSample) -> ShadowPass {
        ShadowPass {
            light_position: sample.position,
            light_target: Vec3::ZERO,
            size: self.settings.size,
            resolution: self.buffer.term().resolution(),
            ground_extent: self.settings.ground_extent,
        }
    }

    /// Take at most one sample. A failed cast is not counted and is retried next tick.
    pub fn tick(&mut self, caster: &mut dyn ShadowCaster) -> TickOutcome {
        if self.buffer.is_frozen() {
            return TickOutcome::Idle;
        }

        let sample = match self.pending.take() {
            Some(s) => s,
            None => self.next_sample(),
        };
        let pass = self.pass_for(&sample);

        let result = caster.cast(&pass).and_then(|term| {
            if term.resolution() == pass.resolution {
                Ok(term)
            } else {
                Err(CastError::ResolutionMismatch {
                    expected: pass.resolution,
                    actual: term.resolution(),
                })
            }
        });

        match result {
            Ok(term) => {
                self.buffer.blend(&term, sample.weight);
                let samples = self.buffer.samples();
                let frozen = self.buffer.is_frozen();
                tracing::trace!(samples, offset = ?sample.offset, "shadow sample blended");
                if frozen {
                    tracing::debug!(samples, "shadow accumulation frozen");
                }
                TickOutcome::Blended { samples, frozen }
            }
            Err(e) => {
                tracing::warn!(error = %e, "shadow sample failed, retrying next tick");
                self.pending = Some(sample);
                TickOutcome::Retry {
                    reason: e.to_string(),
                }
            }
        }
    }
}
