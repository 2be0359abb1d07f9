//! 2D orthographic camera.
//!
//! The camera looks down -Z at the XY plane from `z = 20`. World units map
//! 1:1 to viewport units, with the origin at the bottom-left of the viewport
//! when the camera sits at `(0, 0)`.
//!
//! ```
//! use glam::Vec2;
//! use tessera_render::Camera;
//!
//! let mut camera = Camera::new(Vec2::new(-250.0, 0.0));
//! camera.set_position(Vec2::ZERO);
//! let view_projection = camera.projection_matrix() * camera.view_matrix();
//! assert!(!view_projection.is_nan());
//! ```

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Default viewport: 40 by 21 tiles of 32 units.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(32.0 * 40.0, 32.0 * 21.0);

const EYE_Z: f32 = 20.0;
const NEAR: f32 = 0.0;
const FAR: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a camera with the default viewport.
    pub fn new(position: Vec2) -> Self {
        Self::with_viewport(position, DEFAULT_VIEWPORT)
    }

    pub fn with_viewport(position: Vec2, viewport: Vec2) -> Self {
        let mut camera = Self {
            position,
            viewport,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_view();
        camera.update_projection();
        camera
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        if self.position != position {
            self.position = position;
            self.update_view();
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.update_projection();
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Convert a screen position (pixels, origin top-left) to world coordinates.
    pub fn screen_to_world(&self, screen_pos: Vec2, screen_size: Vec2) -> Vec2 {
        let ndc_x = (screen_pos.x / screen_size.x) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_pos.y / screen_size.y) * 2.0;
        let inverse = (self.projection_matrix * self.view_matrix).inverse();
        let world = inverse * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        Vec2::new(world.x / world.w, world.y / world.w)
    }

    fn update_view(&mut self) {
        let eye = Vec3::new(self.position.x, self.position.y, EYE_Z);
        let center = Vec3::new(self.position.x, self.position.y, -1.0);
        self.view_matrix = Mat4::look_at_rh(eye, center, Vec3::Y);
    }

    fn update_projection(&mut self) {
        self.projection_matrix =
            Mat4::orthographic_rh(0.0, self.viewport.x, 0.0, self.viewport.y, NEAR, FAR);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}
