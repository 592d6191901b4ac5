use glam::Vec2;
use lumen_common::{PointerState, Viewport};

/// A pointer event as delivered by the host windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved to a pixel position, origin top-left.
    Moved { x: f32, y: f32 },
    /// Cursor left the drawable surface.
    Left,
}

/// Folds pointer events into the latest pixel position.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last_pixel: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved { x, y } => {
                self.last_pixel = Some(Vec2::new(x, y));
            }
            PointerEvent::Left => {
                tracing::trace!("pointer left surface");
                self.last_pixel = None;
            }
        }
    }

    /// Latest pixel position, if the pointer is over the surface.
    pub fn pixel(&self) -> Option<Vec2> {
        self.last_pixel
    }

    /// Normalized snapshot for this frame: x right, y up, `[-1, 1]` across the viewport.
    pub fn snapshot(&self, viewport: Viewport) -> PointerState {
        match self.last_pixel {
            Some(p) if viewport.width > 0.0 && viewport.height > 0.0 => PointerState::new(
                p.x / viewport.width * 2.0 - 1.0,
                -(p.y / viewport.height) * 2.0 + 1.0,
            ),
            _ => PointerState::CENTERED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn untouched_tracker_is_centered() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.snapshot(viewport()), PointerState::CENTERED);
    }

    #[test]
    fn corners_map_to_unit_square() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Moved { x: 0.0, y: 0.0 });
        assert_eq!(tracker.snapshot(viewport()), PointerState::new(-1.0, 1.0));

        tracker.handle(PointerEvent::Moved { x: 800.0, y: 600.0 });
        assert_eq!(tracker.snapshot(viewport()), PointerState::new(1.0, -1.0));

        tracker.handle(PointerEvent::Moved { x: 400.0, y: 300.0 });
        assert_eq!(tracker.snapshot(viewport()), PointerState::CENTERED);
    }

    #[test]
    fn leaving_recenters() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Moved { x: 10.0, y: 20.0 });
        assert!(tracker.pixel().is_some());
        tracker.handle(PointerEvent::Left);
        assert!(tracker.pixel().is_none());
        assert_eq!(tracker.snapshot(viewport()), PointerState::CENTERED);
    }

    #[test]
    fn degenerate_viewport_is_centered() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Moved { x: 10.0, y: 20.0 });
        assert_eq!(
            tracker.snapshot(Viewport::new(0.0, 0.0)),
            PointerState::CENTERED
        );
    }
}
