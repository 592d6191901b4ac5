use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one scene instance. Accumulated state belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(pub Uuid);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized pointer offset, roughly `[-1, 1]` per axis (x right, y up).
///
/// The default is the centered pointer, which is also what an absent pointer reads as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState(pub Vec2);

impl PointerState {
    pub const CENTERED: Self = Self(Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

/// Drawable surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Everything the host hands the engine for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    pub pointer: PointerState,
    pub viewport: Viewport,
    /// Elapsed time since the previous frame, in seconds.
    pub delta_time: f32,
}

impl FrameContext {
    pub fn new(pointer: Option<PointerState>, viewport: Viewport, delta_time: f32) -> Self {
        Self {
            pointer: pointer.unwrap_or(PointerState::CENTERED),
            viewport,
            delta_time,
        }
    }
}
