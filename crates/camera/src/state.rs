use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use lumen_common::{CameraSettings, Viewport};

/// Camera transform as uploaded to the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_projection: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

/// Orthographic camera: position, zoom, and a fixed look-at point.
///
/// Owned by the render loop and written once per frame by the rig. The renderer
/// only reads it, through [`CameraState::uniform`].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Pixels per world unit.
    pub zoom: f32,
    pub look_at: Vec3,
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
    uniform: CameraUniform,
}

impl CameraState {
    pub fn new(position: Vec3, zoom: f32, settings: &CameraSettings, viewport: Viewport) -> Self {
        let mut state = Self {
            position,
            zoom,
            look_at: settings.look_at,
            up: Vec3::Y,
            near: settings.near,
            far: settings.far,
            viewport,
            uniform: CameraUniform::zeroed(),
        };
        state.update_projection();
        state
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }

    /// Half-extents are `viewport / (2 * zoom)`, so zoom is pixels per world unit.
    ///
    /// The vertical extent follows the viewport aspect, which stays finite for a
    /// zero-height viewport.
    pub fn projection_matrix(&self) -> Mat4 {
        let zoom = self.zoom.max(f32::EPSILON);
        let half_w = self.viewport.width / (2.0 * zoom);
        let half_h = half_w / self.viewport.aspect();
        Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Recompute the cached uniform from the current pose and viewport.
    pub fn update_projection(&mut self) {
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        self.uniform = CameraUniform {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            view_projection: (projection * view).to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        };
    }

    /// Transform as of the last [`CameraState::update_projection`].
    pub fn uniform(&self) -> &CameraUniform {
        &self.uniform
    }
}
