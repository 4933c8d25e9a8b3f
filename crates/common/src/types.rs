use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a texture loaded through the texture registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Handle to decoded sound data held by an audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Handle to one playing instance of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoiceHandle(pub u32);

/// Local transform: scale, Euler rotation (radians), translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

impl Transform {
    /// Transform with only a translation set.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Compose the local matrix.
    ///
    /// Row-vector order is `S * Rx * Ry * Rz * T`; with glam's column vectors
    /// that is `T * Rz * Ry * Rx * S`.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_applies_before_translation() {
        let t = Transform {
            scale: Vec3::splat(2.0),
            translation: Vec3::new(1.0, 0.0, 0.0),
            ..Transform::default()
        };
        let p = t.local_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn rotation_applies_x_then_y_then_z() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let t = Transform {
            rotation: Vec3::new(half_pi, half_pi, 0.0),
            ..Transform::default()
        };
        // +Y rotated about X goes to +Z, then about Y goes to +X.
        let p = t.local_matrix().transform_point3(Vec3::Y);
        assert!(p.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let t: Transform = serde_json::from_str(r#"{"translation":[0.0,4.5,0.0]}"#).unwrap();
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.translation, Vec3::new(0.0, 4.5, 0.0));
    }
}
