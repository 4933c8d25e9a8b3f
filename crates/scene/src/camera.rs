use crate::config::CameraConfig;
use glam::Vec3;
use rigscene_input::{InputSource, Key};
use rigscene_render::{DebugText, ViewProjection};
use std::f32::consts::{FRAC_PI_2, PI};

pub(crate) const MIN_FOV: f32 = 0.01;
pub(crate) const MAX_FOV: f32 = PI - MIN_FOV;
pub(crate) const MIN_NEAR_Z: f32 = 0.1;
/// Closest the eye may get to the target before W/S stop moving it.
pub(crate) const MIN_EYE_DISTANCE: f32 = 0.5;

/// Keyboard-driven camera over a [`ViewProjection`].
///
/// W/S move the eye along z, A/D move the target along x, Q/E roll the up
/// vector, R/F widen or narrow the field of view and N/M raise or lower the
/// near clip plane.
#[derive(Debug, Clone)]
pub struct FreeCamera {
    view: ViewProjection,
    /// Roll of the up vector away from +Y, radians.
    up_angle: f32,
    config: CameraConfig,
}

impl FreeCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut view = ViewProjection::default();
        view.eye = config.eye;
        view.target = config.target;
        view.up = Vec3::Y;
        view.fov_angle_y = config.fov_degrees.to_radians();
        view.aspect_ratio = config.aspect_ratio;
        view.near_z = config.near_z;
        view.far_z = config.far_z;
        view.initialize();
        Self {
            view,
            up_angle: 0.0,
            config,
        }
    }

    pub fn view(&self) -> &ViewProjection {
        &self.view
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.view.aspect_ratio = aspect_ratio;
        self.view.update_matrix();
    }

    /// Apply this frame's held keys, then recompute the matrices.
    pub fn update(&mut self, input: &dyn InputSource) {
        let c = &self.config;
        let axis = |pos: Key, neg: Key| -> f32 {
            match (input.push_key(pos), input.push_key(neg)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };

        let mut eye = self.view.eye;
        eye.z += axis(Key::W, Key::S) * c.eye_speed;
        if eye.distance(self.view.target) >= MIN_EYE_DISTANCE {
            self.view.eye = eye;
        }
        let mut target = self.view.target;
        target.x += axis(Key::D, Key::A) * c.target_speed;
        if target.distance(self.view.eye) >= MIN_EYE_DISTANCE {
            self.view.target = target;
        }

        let roll = axis(Key::E, Key::Q);
        if roll != 0.0 {
            self.up_angle = (self.up_angle + roll * c.roll_speed).rem_euclid(2.0 * PI);
            let a = self.up_angle + FRAC_PI_2;
            self.view.up = Vec3::new(a.cos(), a.sin(), 0.0);
        }

        self.view.fov_angle_y =
            (self.view.fov_angle_y + axis(Key::R, Key::F) * c.fov_speed).clamp(MIN_FOV, MAX_FOV);

        let near_max = (self.view.far_z - c.near_speed).max(MIN_NEAR_Z);
        self.view.near_z =
            (self.view.near_z + axis(Key::N, Key::M) * c.near_speed).clamp(MIN_NEAR_Z, near_max);

        self.view.update_matrix();
    }

    /// Print the camera state starting at `y`.
    pub fn print(&self, text: &mut DebugText, x: f32, y: f32) {
        let v = &self.view;
        text.set_pos(x, y);
        text.printf(format_args!("eye:({:.2},{:.2},{:.2})", v.eye.x, v.eye.y, v.eye.z));
        text.printf(format_args!(
            "target:({:.2},{:.2},{:.2})",
            v.target.x, v.target.y, v.target.z
        ));
        text.printf(format_args!("up:({:.2},{:.2},{:.2})", v.up.x, v.up.y, v.up.z));
        text.printf(format_args!("fovAngleY(Degree):{:.2}", v.fov_angle_y.to_degrees()));
        text.printf(format_args!("nearZ:{:.2}", v.near_z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscene_input::KeyboardState;

    fn held(keys: &[Key]) -> KeyboardState {
        let mut kb = KeyboardState::new();
        kb.set_held(keys.iter().copied());
        kb
    }

    #[test]
    fn starts_from_config() {
        let cam = FreeCamera::new(CameraConfig::default());
        assert_eq!(cam.view().eye, Vec3::new(0.0, 0.0, -50.0));
        assert_eq!(cam.view().up, Vec3::Y);
        assert!((cam.view().fov_angle_y - 45.0_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn w_moves_eye_forward() {
        let mut cam = FreeCamera::new(CameraConfig::default());
        cam.update(&held(&[Key::W]));
        assert!((cam.view().eye.z - (-49.8)).abs() < 1e-4);
        let before = cam.view().view_matrix();
        cam.update(&held(&[Key::S]));
        assert_ne!(before, cam.view().view_matrix());
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut cam = FreeCamera::new(CameraConfig::default());
        cam.update(&held(&[Key::A, Key::D]));
        assert_eq!(cam.view().target, Vec3::ZERO);
    }

    #[test]
    fn roll_rotates_up_vector() {
        let mut cam = FreeCamera::new(CameraConfig {
            roll_speed: FRAC_PI_2,
            ..CameraConfig::default()
        });
        cam.update(&held(&[Key::E]));
        assert!(cam.view().up.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn fov_is_clamped() {
        let mut cam = FreeCamera::new(CameraConfig {
            fov_speed: 1.0,
            ..CameraConfig::default()
        });
        for _ in 0..10 {
            cam.update(&held(&[Key::R]));
        }
        assert_eq!(cam.view().fov_angle_y, MAX_FOV);
        assert!(cam.view().projection_matrix().is_finite());
        for _ in 0..10 {
            cam.update(&held(&[Key::F]));
        }
        assert_eq!(cam.view().fov_angle_y, MIN_FOV);
    }

    #[test]
    fn near_clip_has_floor() {
        let mut cam = FreeCamera::new(CameraConfig::default());
        cam.update(&held(&[Key::M]));
        assert_eq!(cam.view().near_z, MIN_NEAR_Z);
        cam.update(&held(&[Key::N]));
        assert!(cam.view().near_z > MIN_NEAR_Z);
    }

    #[test]
    fn near_clip_stops_before_far_plane() {
        let mut cam = FreeCamera::new(CameraConfig {
            far_z: 2.0,
            near_speed: 0.5,
            ..CameraConfig::default()
        });
        for _ in 0..10 {
            cam.update(&held(&[Key::N]));
        }
        assert_eq!(cam.view().near_z, 1.5);
        assert!(cam.view().projection_matrix().is_finite());
    }

    #[test]
    fn narrow_clip_range_does_not_panic() {
        let mut cam = FreeCamera::new(CameraConfig {
            near_z: 0.1,
            far_z: 0.15,
            ..CameraConfig::default()
        });
        cam.update(&KeyboardState::new());
        cam.update(&held(&[Key::N]));
        assert_eq!(cam.view().near_z, MIN_NEAR_Z);
    }

    #[test]
    fn eye_stops_short_of_target() {
        let mut cam = FreeCamera::new(CameraConfig {
            eye_speed: 1.0,
            ..CameraConfig::default()
        });
        for _ in 0..100 {
            cam.update(&held(&[Key::W]));
        }
        let view = cam.view();
        assert!(view.eye.distance(view.target) >= MIN_EYE_DISTANCE);
        assert!(view.eye.z < 0.0);
        assert!(view.view_matrix().is_finite());

        // Once the target moves aside the eye can pass it.
        for _ in 0..10 {
            cam.update(&held(&[Key::D]));
        }
        for _ in 0..10 {
            cam.update(&held(&[Key::W]));
        }
        assert!(cam.view().eye.z > 0.0);
        assert!(cam.view().view_matrix().is_finite());

        // Bring the eye level with the target, then slide the target back.
        for _ in 0..100 {
            cam.update(&held(&[Key::S]));
            if cam.view().eye.z.abs() < 0.05 {
                break;
            }
        }
        for _ in 0..20 {
            cam.update(&held(&[Key::A]));
        }
        let view = cam.view();
        assert!(view.eye.distance(view.target) >= MIN_EYE_DISTANCE);
    }

    #[test]
    fn prints_five_lines() {
        let cam = FreeCamera::new(CameraConfig::default());
        let mut text = DebugText::new();
        cam.print(&mut text, 50.0, 110.0);
        let lines = text.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].text, "eye:(0.00,0.00,-50.00)");
        assert_eq!(lines[3].text, "fovAngleY(Degree):45.00");
    }
}
