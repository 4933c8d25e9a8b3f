//! Scene configuration, loadable from JSON. Every field has a default, so a
//! config file only needs the values it changes.

use crate::camera::{MAX_FOV, MIN_EYE_DISTANCE, MIN_FOV, MIN_NEAR_Z};
use crate::error::SceneError;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Texture used by the sprite and every rig part.
    pub texture: String,
    /// Wave file played at start-up.
    pub sound: String,
    pub greeting: String,
    pub year: u32,
    pub sprite: SpriteConfig,
    pub camera: CameraConfig,
    pub rig: RigConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture: "mario.jpg".into(),
            sound: "se_sad03.wav".into(),
            greeting: "Kaizokuou ni oreha naru.".into(),
            year: 2001,
            sprite: SpriteConfig::default(),
            camera: CameraConfig::default(),
            rig: RigConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Top-left corner at start-up, in pixels.
    pub origin: Vec2,
    /// Pixels moved per frame.
    pub velocity: Vec2,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(100.0, 50.0),
            velocity: Vec2::new(2.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near_z: f32,
    pub far_z: f32,
    /// Eye movement per frame along z.
    pub eye_speed: f32,
    /// Target movement per frame along x.
    pub target_speed: f32,
    /// Up-vector roll per frame, radians.
    pub roll_speed: f32,
    /// Field-of-view change per frame, radians.
    pub fov_speed: f32,
    pub near_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -50.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
            aspect_ratio: 1280.0 / 720.0,
            near_z: 0.1,
            far_z: 1000.0,
            eye_speed: 0.2,
            target_speed: 0.2,
            roll_speed: 0.05,
            fov_speed: 0.01,
            near_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Root movement per frame along x.
    pub move_speed: f32,
    /// Chest and hip rotation per frame, radians.
    pub rotate_speed: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            rotate_speed: 0.05,
        }
    }
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), SceneError> {
        let cam = &self.camera;
        let speeds = [
            ("eye_speed", cam.eye_speed),
            ("target_speed", cam.target_speed),
            ("roll_speed", cam.roll_speed),
            ("fov_speed", cam.fov_speed),
            ("near_speed", cam.near_speed),
            ("rig.move_speed", self.rig.move_speed),
            ("rig.rotate_speed", self.rig.rotate_speed),
        ];
        if let Some((name, speed)) = speeds.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(SceneError::InvalidConfig(format!(
                "{name} must be finite and non-negative, got {speed}"
            )));
        }
        if !(cam.near_z >= MIN_NEAR_Z && cam.near_z < cam.far_z && cam.far_z.is_finite()) {
            return Err(SceneError::InvalidConfig(format!(
                "camera clip range {}..{} is empty",
                cam.near_z, cam.far_z
            )));
        }
        // N must always have room to move the near plane.
        if cam.far_z - cam.near_speed < MIN_NEAR_Z {
            return Err(SceneError::InvalidConfig(format!(
                "far plane {} leaves no room for near_speed {}",
                cam.far_z, cam.near_speed
            )));
        }
        if !(cam.fov_degrees >= MIN_FOV.to_degrees() && cam.fov_degrees <= MAX_FOV.to_degrees()) {
            return Err(SceneError::InvalidConfig(format!(
                "camera fov {} out of range",
                cam.fov_degrees
            )));
        }
        if !(cam.aspect_ratio > 0.0 && cam.aspect_ratio.is_finite()) {
            return Err(SceneError::InvalidConfig("aspect ratio must be positive".into()));
        }
        if !(cam.eye.is_finite() && cam.target.is_finite())
            || cam.eye.distance(cam.target) < MIN_EYE_DISTANCE
        {
            return Err(SceneError::InvalidConfig(format!(
                "camera eye {} is too close to target {}",
                cam.eye, cam.target
            )));
        }
        Ok(())
    }
}
