use lumen_camera::MountPhase;
use lumen_common::SceneId;
use lumen_kernel::SceneRenderLoop;
use lumen_shadow::AccumulatorState;
use serde::Serialize;

/// Read-only queries against a scene loop for debugging and CLI output.
pub struct LoopInspector;

impl LoopInspector {
    pub fn summary(scene: &SceneRenderLoop) -> LoopSummary {
        let camera = scene.camera();
        let buffer = scene.shadows().buffer();
        LoopSummary {
            scene: scene.scene_id(),
            ticks: scene.tick_count(),
            phase: scene.phase(),
            zoom: camera.zoom,
            target_zoom: scene.rig().zoom_channel().target(),
            position: camera.position.to_array(),
            shadow_state: scene.shadows().state(),
            samples: buffer.samples(),
            target_samples: buffer.target(),
            progress: buffer.progress(),
            weight_sum: buffer.weight_sum(),
            mean_occlusion: buffer.term().mean(),
            digest: buffer.term().digest(),
            pending_events: scene.events().len(),
        }
    }
}

/// Snapshot of a scene loop.
#[derive(Debug, Clone, Serialize)]
pub struct LoopSummary {
    pub scene: SceneId,
    pub ticks: u64,
    pub phase: MountPhase,
    pub zoom: f32,
    pub target_zoom: f32,
    pub position: [f32; 3],
    pub shadow_state: AccumulatorState,
    pub samples: u32,
    pub target_samples: u32,
    /// `samples / target_samples`, 1.0 once frozen.
    pub progress: f32,
    pub weight_sum: f64,
    pub mean_occlusion: f32,
    pub digest: String,
    pub pending_events: usize,
}

impl std::fmt::Display for LoopSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Scene {}: ticks={} phase={:?}",
            self.scene.0, self.ticks, self.phase
        )?;
        writeln!(
            f,
            "Camera: pos=({:.2}, {:.2}, {:.2}) zoom={:.2} target_zoom={:.2}",
            self.position[0], self.position[1], self.position[2], self.zoom, self.target_zoom
        )?;
        write!(
            f,
            "Shadow: {:?} samples={}/{} ({:.0}%) weight={:.4} occlusion={:.3} digest={:.12}",
            self.shadow_state,
            self.samples,
            self.target_samples,
            self.progress * 100.0,
            self.weight_sum,
            self.mean_occlusion,
            self.digest
        )
    }
}
