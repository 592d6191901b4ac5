use lumen_camera::CameraState;
use lumen_shadow::{
    AccumulationBuffer, CastError, ShadowCaster, ShadowPass, ShadowStyle, ShadowTerm,
};

use crate::raster::cast_hard_shadow;
use crate::scene::SceneLayout;

/// Errors from drawing a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("no camera has been set")]
    MissingCamera,
    #[error("draw failed: {0}")]
    DrawFailed(String),
}

/// Renderer capability set: accept camera and shadow state, draw a frame, and
/// render shadow samples on request.
///
/// Implementations read the state they are handed; they never mutate engine state.
pub trait SceneRenderer: ShadowCaster {
    /// The output type produced by one frame.
    type Output;

    fn set_camera(&mut self, camera: &CameraState);

    fn set_shadow(&mut self, buffer: &AccumulationBuffer, style: &ShadowStyle);

    fn draw_frame(&mut self) -> Result<Self::Output, RenderError>;
}

#[derive(Debug, Clone, PartialEq)]
struct CameraSnapshot {
    eye: [f32; 4],
    zoom: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct ShadowSnapshot {
    samples: u32,
    target: u32,
    frozen: bool,
    /// Fraction of texels with non-zero alpha after compositing.
    coverage: f32,
    digest: String,
}

/// Text backend: one human-readable summary per frame, hard shadows on the CPU.
///
/// Failures can be injected for exercising retry paths.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    layout: SceneLayout,
    camera: Option<CameraSnapshot>,
    shadow: Option<ShadowSnapshot>,
    frames_drawn: u64,
    casts: u64,
    failing_casts: u32,
    failing_draws: u32,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: SceneLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Successful shadow casts so far.
    pub fn casts(&self) -> u64 {
        self.casts
    }

    /// Make the next `count` shadow casts fail.
    pub fn fail_next_casts(&mut self, count: u32) {
        self.failing_casts = count;
    }

    /// Make the next `count` frame draws fail.
    pub fn fail_next_draws(&mut self, count: u32) {
        self.failing_draws = count;
    }
}

impl ShadowCaster for DebugTextRenderer {
    fn cast(&mut self, pass: &ShadowPass) -> Result<ShadowTerm, CastError> {
        if self.failing_casts > 0 {
            self.failing_casts -= 1;
            return Err(CastError::Failed("injected cast failure".into()));
        }
        self.casts += 1;
        let term = cast_hard_shadow(&self.layout, pass);
        tracing::trace!(
            light = ?pass.light_position,
            occlusion = term.mean(),
            "hard shadow cast"
        );
        Ok(term)
    }
}

impl SceneRenderer for DebugTextRenderer {
    type Output = String;

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = Some(CameraSnapshot {
            eye: camera.uniform().eye,
            zoom: camera.zoom,
        });
    }

    fn set_shadow(&mut self, buffer: &AccumulationBuffer, style: &ShadowStyle) {
        let texels = buffer.resolve(style);
        let covered = texels.iter().filter(|t| t[3] > 0.0).count();
        self.shadow = Some(ShadowSnapshot {
            samples: buffer.samples(),
            target: buffer.target(),
            frozen: buffer.is_frozen(),
            coverage: covered as f32 / texels.len().max(1) as f32,
            digest: buffer.term().digest(),
        });
    }

    fn draw_frame(&mut self) -> Result<String, RenderError> {
        if self.failing_draws > 0 {
            self.failing_draws -= 1;
            return Err(RenderError::DrawFailed("injected draw failure".into()));
        }
        let camera = self.camera.as_ref().ok_or(RenderError::MissingCamera)?;

        let mut out = format!("=== Frame {} ===\n", self.frames_drawn);
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) zoom={:.2}\n",
            camera.eye[0], camera.eye[1], camera.eye[2], camera.zoom
        ));
        match &self.shadow {
            Some(s) => out.push_str(&format!(
                "Shadow: samples={}/{} frozen={} coverage={:.1}% digest={}\n",
                s.samples,
                s.target,
                s.frozen,
                s.coverage * 100.0,
                &s.digest[..12]
            )),
            None => out.push_str("Shadow: none\n"),
        }

        tracing::trace!(frame = self.frames_drawn, "debug frame drawn");
        self.frames_drawn += 1;
        Ok(out)
    }
}
