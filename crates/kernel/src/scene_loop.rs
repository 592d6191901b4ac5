use glam::Vec3;
use lumen_camera::{CameraRig, CameraState, MountPhase};
use lumen_common::{FrameContext, SceneConfig, SceneId, Viewport};
use lumen_render::{RenderError, SceneRenderer};
use lumen_shadow::{ShadowAccumulator, TickOutcome};
use serde::Serialize;

/// A record of one mutation made during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FrameEvent {
    /// Camera moved toward its target pose.
    CameraAdvanced {
        tick: u64,
        position: Vec3,
        zoom: f32,
        target_zoom: f32,
    },
    /// One shadow sample was blended.
    ShadowBlended { tick: u64, samples: u32 },
    /// The shadow cast failed; the sample is retried next tick.
    ShadowRetried { tick: u64, reason: String },
    /// The shadow buffer reached its target and froze.
    ShadowFrozen { tick: u64, samples: u32 },
    /// Accumulated shadows were discarded.
    ShadowReset { tick: u64 },
    /// The renderer drew the frame.
    FrameDrawn { tick: u64 },
    /// The first frame completed; the rig switched to the steady zoom policy.
    Mounted { tick: u64 },
}

/// Errors from a tick.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame {tick} failed to draw: {source}")]
    Draw {
        tick: u64,
        #[source]
        source: RenderError,
    },
}

/// Drives one scene: camera rig, shadow accumulator, and the hand-off to a renderer.
///
/// Owns the camera state and accumulation buffer exclusively; the renderer
/// only receives read access during [`SceneRenderLoop::tick`].
#[derive(Debug)]
pub struct SceneRenderLoop {
    scene: SceneId,
    tick: u64,
    rig: CameraRig,
    camera: CameraState,
    shadows: ShadowAccumulator,
    /// Append-only log of mutations.
    events: Vec<FrameEvent>,
}

impl SceneRenderLoop {
    /// Build a scene for the first viewport the host reports.
    pub fn new(config: &SceneConfig, viewport: Viewport) -> Self {
        let rig = CameraRig::new(config.camera.clone(), viewport);
        let camera = rig.initial_state(viewport);
        let scene = SceneId::new();
        tracing::info!(scene = %scene.0, width = viewport.width, "scene created");
        Self {
            scene,
            tick: 0,
            rig,
            camera,
            shadows: ShadowAccumulator::new(config.shadow.clone()),
            events: Vec::new(),
        }
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn phase(&self) -> MountPhase {
        self.rig.phase()
    }

    pub fn shadows(&self) -> &ShadowAccumulator {
        &self.shadows
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move the nominal light.
    ///
    /// Accumulated shadows stay stale until [`SceneRenderLoop::reset_shadows`].
    pub fn set_light_position(&mut self, position: Vec3) {
        self.shadows.set_light_position(position);
    }

    /// Throw away accumulated shadows, e.g. after the light or geometry changed.
    pub fn reset_shadows(&mut self) {
        self.shadows.reset();
        self.events.push(FrameEvent::ShadowReset { tick: self.tick });
    }

    /// Run one frame: advance the camera, fold in at most one shadow sample, then draw.
    ///
    /// A failed draw still counts as a tick, but the frame is not complete, so
    /// the rig stays in its pre-mount policy.
    pub fn tick<R: SceneRenderer>(
        &mut self,
        ctx: &FrameContext,
        renderer: &mut R,
    ) -> Result<R::Output, FrameError> {
        let tick = self.tick;
        let _span = tracing::info_span!("frame", tick).entered();
        self.tick += 1;

        self.rig.advance(&mut self.camera, ctx);
        self.events.push(FrameEvent::CameraAdvanced {
            tick,
            position: self.camera.position,
            zoom: self.camera.zoom,
            target_zoom: self.rig.zoom_channel().target(),
        });

        match self.shadows.tick(&mut *renderer) {
            TickOutcome::Blended { samples, frozen } => {
                self.events.push(FrameEvent::ShadowBlended { tick, samples });
                if frozen {
                    tracing::info!(samples, "soft shadows settled");
                    self.events.push(FrameEvent::ShadowFrozen { tick, samples });
                }
            }
            TickOutcome::Retry { reason } => {
                self.events.push(FrameEvent::ShadowRetried { tick, reason });
            }
            TickOutcome::Idle => {}
        }

        renderer.set_camera(&self.camera);
        renderer.set_shadow(self.shadows.buffer(), &self.shadows.style());
        let output = renderer.draw_frame().map_err(|source| {
            tracing::warn!(error = %source, "frame draw failed");
            FrameError::Draw { tick, source }
        })?;
        self.events.push(FrameEvent::FrameDrawn { tick });

        if self.rig.mark_mounted() {
            self.events.push(FrameEvent::Mounted { tick });
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::PointerState;
    use lumen_render::{DebugTextRenderer, SceneLayout};
    use lumen_shadow::{AccumulatorState, ShadowTerm};

    const DT: f32 = 0.016;

    fn viewport() -> Viewport {
        Viewport::new(1400.0, 900.0)
    }

    fn ctx() -> FrameContext {
        FrameContext::new(Some(PointerState::CENTERED), viewport(), DT)
    }

    fn small_config(target: u32) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.shadow.target_samples = target;
        config.shadow.resolution = 16;
        config
    }

    #[test]
    fn end_to_end_settles_camera_and_shadows() {
        let mut scene = SceneRenderLoop::new(&SceneConfig::default(), viewport());
        let mut renderer = DebugTextRenderer::new();

        for i in 0..120u64 {
            scene.tick(&ctx(), &mut renderer).unwrap();
            if i == 98 {
                assert_eq!(scene.shadows().state(), AccumulatorState::Accumulating);
            }
            if i == 99 {
                assert_eq!(scene.shadows().state(), AccumulatorState::Frozen);
            }
        }

        assert_eq!(scene.phase(), MountPhase::Steady);
        let zoom = scene.camera().zoom;
        assert!((zoom - 40.0).abs() < 0.4, "zoom {zoom} not within 1% of 40");
        assert!(scene.shadows().buffer().is_frozen());
        assert_eq!(scene.shadows().buffer().samples(), 100);
        assert!((scene.shadows().buffer().weight_sum() - 1.0).abs() < 1e-5);
        assert_eq!(renderer.frames_drawn(), 120);
        assert_eq!(renderer.casts(), 100);
    }

    #[test]
    fn mount_happens_after_first_frame_only() {
        let mut scene = SceneRenderLoop::new(&small_config(4), viewport());
        let mut renderer = DebugTextRenderer::new();
        for _ in 0..5 {
            scene.tick(&ctx(), &mut renderer).unwrap();
        }

        let targets: Vec<f32> = scene
            .events()
            .iter()
            .filter_map(|e| match e {
                FrameEvent::CameraAdvanced { target_zoom, .. } => Some(*target_zoom),
                _ => None,
            })
            .collect();
        assert_eq!(targets[0], 1400.0 / 17.0);
        assert!(targets[1..].iter().all(|t| *t == 1400.0 / 35.0));

        let mounts: Vec<&FrameEvent> = scene
            .events()
            .iter()
            .filter(|e| matches!(e, FrameEvent::Mounted { .. }))
            .collect();
        assert_eq!(mounts, [&FrameEvent::Mounted { tick: 0 }]);
    }

    #[test]
    fn events_follow_frame_order() {
        let mut scene = SceneRenderLoop::new(&small_config(4), viewport());
        let mut renderer = DebugTextRenderer::new();
        scene.tick(&ctx(), &mut renderer).unwrap();

        let kinds: Vec<&str> = scene
            .events()
            .iter()
            .map(|e| match e {
                FrameEvent::CameraAdvanced { .. } => "camera",
                FrameEvent::ShadowBlended { .. } => "blend",
                FrameEvent::FrameDrawn { .. } => "draw",
                FrameEvent::Mounted { .. } => "mount",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["camera", "blend", "draw", "mount"]);
    }

    #[test]
    fn draw_output_sees_updated_state() {
        let mut scene = SceneRenderLoop::new(&small_config(4), viewport());
        let mut renderer = DebugTextRenderer::new();
        let out = scene.tick(&ctx(), &mut renderer).unwrap();
        assert!(out.contains("samples=1/4"));
        assert!(out.contains(&format!("zoom={:.2}", scene.camera().zoom)));
    }

    #[test]
    fn failed_casts_delay_but_never_skip_samples() {
        let mut scene = SceneRenderLoop::new(&small_config(3), viewport());
        let mut renderer = DebugTextRenderer::new();
        renderer.fail_next_casts(2);

        for _ in 0..5 {
            scene.tick(&ctx(), &mut renderer).unwrap();
        }
        let retries = scene
            .events()
            .iter()
            .filter(|e| matches!(e, FrameEvent::ShadowRetried { .. }))
            .count();
        assert_eq!(retries, 2);
        assert!(scene.shadows().buffer().is_frozen());
        assert_eq!(scene.shadows().buffer().samples(), 3);
        assert!(
            scene
                .events()
                .contains(&FrameEvent::ShadowFrozen { tick: 4, samples: 3 })
        );
    }

    #[test]
    fn failed_draw_does_not_mount() {
        let mut scene = SceneRenderLoop::new(&small_config(4), viewport());
        let mut renderer = DebugTextRenderer::new();
        renderer.fail_next_draws(1);

        let err = scene.tick(&ctx(), &mut renderer).unwrap_err();
        assert!(matches!(err, FrameError::Draw { tick: 0, .. }));
        assert_eq!(scene.phase(), MountPhase::Initializing);
        assert_eq!(scene.tick_count(), 1);

        scene.tick(&ctx(), &mut renderer).unwrap();
        assert_eq!(scene.phase(), MountPhase::Steady);
        assert!(scene.events().contains(&FrameEvent::Mounted { tick: 1 }));
    }

    #[test]
    fn frozen_shadows_survive_light_move_until_reset() {
        let mut scene = SceneRenderLoop::new(&small_config(2), viewport());
        let mut renderer = DebugTextRenderer::new();
        for _ in 0..3 {
            scene.tick(&ctx(), &mut renderer).unwrap();
        }
        let digest = scene.shadows().buffer().term().digest();

        scene.set_light_position(Vec3::new(10.0, 10.0, 10.0));
        scene.tick(&ctx(), &mut renderer).unwrap();
        assert_eq!(scene.shadows().buffer().term().digest(), digest);

        scene.reset_shadows();
        assert_eq!(scene.shadows().state(), AccumulatorState::Accumulating);
        scene.tick(&ctx(), &mut renderer).unwrap();
        assert_eq!(scene.shadows().buffer().samples(), 1);
        assert!(scene.events().contains(&FrameEvent::ShadowReset { tick: 4 }));
    }

    #[test]
    fn empty_layout_settles_to_unshadowed_ground() {
        let mut scene = SceneRenderLoop::new(&small_config(3), viewport());
        let mut renderer = DebugTextRenderer::with_layout(SceneLayout::empty());
        assert!(renderer.layout().occluders.is_empty());
        for _ in 0..4 {
            scene.tick(&ctx(), &mut renderer).unwrap();
        }
        let buffer = scene.shadows().buffer();
        assert!(buffer.is_frozen());
        assert_eq!(buffer.term().digest(), ShadowTerm::new(16).digest());
        assert!(
            buffer
                .resolve(&scene.shadows().style())
                .iter()
                .all(|t| t[3] == 0.0)
        );
    }

    #[test]
    fn drain_events_clears_log() {
        let mut scene = SceneRenderLoop::new(&small_config(2), viewport());
        let mut renderer = DebugTextRenderer::new();
        scene.tick(&ctx(), &mut renderer).unwrap();
        let events = scene.drain_events();
        assert_eq!(events.len(), 4);
        assert!(scene.events().is_empty());
    }

    #[test]
    fn events_serialize_as_tagged_json() {
        let mut scene = SceneRenderLoop::new(&small_config(2), viewport());
        let mut renderer = DebugTextRenderer::new();
        scene.tick(&ctx(), &mut renderer).unwrap();
        let json = serde_json::to_string(scene.events()).unwrap();
        assert!(json.contains("\"event\":\"camera_advanced\""));
        assert!(json.contains("\"event\":\"mounted\""));
    }

    #[test]
    fn idle_host_freezes_state() {
        let mut scene = SceneRenderLoop::new(&small_config(4), viewport());
        let mut renderer = DebugTextRenderer::new();
        scene.tick(&ctx(), &mut renderer).unwrap();
        let camera = scene.camera().clone();
        let samples = scene.shadows().buffer().samples();
        // No ticks: nothing moves on its own.
        assert_eq!(scene.camera(), &camera);
        assert_eq!(scene.shadows().buffer().samples(), samples);
    }
}
