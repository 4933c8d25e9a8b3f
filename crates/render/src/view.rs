use glam::{Mat4, Vec3};

/// Camera producing left-handed view and projection matrices.
///
/// Like a transform node, the matrices are only valid right after
/// [`update_matrix`](Self::update_matrix).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_angle_y: f32,
    pub aspect_ratio: f32,
    pub near_z: f32,
    pub far_z: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for ViewProjection {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -50.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_angle_y: 45.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near_z: 0.1,
            far_z: 1000.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl ViewProjection {
    pub fn initialize(&mut self) {
        self.update_matrix();
    }

    /// Recompute both matrices. A view with the eye on the target, or
    /// looking along `up`, has no orientation; the previous view is kept.
    pub fn update_matrix(&mut self) {
        let forward = self.target - self.eye;
        if forward.cross(self.up).length_squared() > f32::EPSILON {
            self.view = Mat4::look_at_lh(self.eye, self.target, self.up);
        } else {
            tracing::warn!(eye = %self.eye, target = %self.target, "degenerate view, keeping previous");
        }
        self.projection =
            Mat4::perspective_lh(self.fov_angle_y, self.aspect_ratio, self.near_z, self.far_z);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
