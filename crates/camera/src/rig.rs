use glam::Vec3;
use lumen_common::{CameraSettings, FrameContext, PointerState, Viewport};
use lumen_motion::Damped;

use crate::state::CameraState;

/// Whether the first frame has completed. Selects the zoom policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum MountPhase {
    /// No frame has completed yet.
    Initializing,
    /// At least one frame has completed. Terminal.
    Steady,
}

/// Per-frame camera controller.
///
/// Computes the target pose from the pointer and the mount phase, then moves
/// the camera toward it through two damped channels (zoom, position).
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: CameraSettings,
    phase: MountPhase,
    zoom: Damped<f32>,
    position: Damped<Vec3>,
}

impl CameraRig {
    /// Start at `settings.start_position`, with zoom sized for the first viewport.
    pub fn new(settings: CameraSettings, viewport: Viewport) -> Self {
        let zoom = Damped::new(
            viewport.width / settings.steady_zoom_divisor,
            settings.zoom_time_constant,
        );
        let position = Damped::new(settings.start_position, settings.position_time_constant);
        Self {
            settings,
            phase: MountPhase::Initializing,
            zoom,
            position,
        }
    }

    /// Camera state matching the rig's current channel values.
    pub fn initial_state(&self, viewport: Viewport) -> CameraState {
        CameraState::new(
            self.position.value(),
            self.zoom.value(),
            &self.settings,
            viewport,
        )
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    pub fn zoom_channel(&self) -> &Damped<f32> {
        &self.zoom
    }

    pub fn position_channel(&self) -> &Damped<Vec3> {
        &self.position
    }

    /// Switch to the steady zoom policy. Returns `true` only on the transition itself.
    pub fn mark_mounted(&mut self) -> bool {
        match self.phase {
            MountPhase::Initializing => {
                self.phase = MountPhase::Steady;
                tracing::debug!("camera rig mounted");
                true
            }
            MountPhase::Steady => false,
        }
    }

    pub fn target_zoom(&self, viewport: Viewport) -> f32 {
        let divisor = match self.phase {
            MountPhase::Initializing => self.settings.initial_zoom_divisor,
            MountPhase::Steady => self.settings.steady_zoom_divisor,
        };
        viewport.width / divisor
    }

    /// Anchor plus scaled pointer offset, with a Z bias of `atan(pointer.x * gain)`.
    pub fn target_position(&self, pointer: PointerState) -> Vec3 {
        if !self.settings.pointer_reactive {
            return self.settings.start_position;
        }
        let s = &self.settings;
        s.anchor
            + Vec3::new(
                pointer.x() * s.pointer_scale.x,
                pointer.y() * s.pointer_scale.y,
                (pointer.x() * s.z_bias_gain).atan(),
            )
    }

    /// Advance both channels by one frame and write the result into `camera`.
    pub fn advance(&mut self, camera: &mut CameraState, ctx: &FrameContext) {
        let target_zoom = self.target_zoom(ctx.viewport);
        if self.phase == MountPhase::Initializing {
            tracing::debug!(
                position = ?camera.position,
                zoom = camera.zoom,
                target_zoom,
                "camera before mount"
            );
        }

        self.zoom.set_target(target_zoom);
        self.position.set_target(self.target_position(ctx.pointer));
        camera.zoom = self.zoom.advance(ctx.delta_time);
        camera.position = self.position.advance(ctx.delta_time);

        camera.viewport = ctx.viewport;
        camera.look_at = self.settings.look_at;
        camera.update_projection();

        tracing::trace!(
            zoom = camera.zoom,
            position = ?camera.position,
            "camera advanced"
        );
    }
}
