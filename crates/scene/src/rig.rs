use crate::config::RigConfig;
use glam::{Mat4, Vec3};
use rigscene_common::{TextureHandle, Transform};
use rigscene_input::{InputSource, Key};
use rigscene_kernel::{Hierarchy, HierarchyError, NodeId};
use rigscene_render::{DebugText, FrameSink, ViewProjection};

/// Parts of the humanoid rig, listed root-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartId {
    Root,
    Spine,
    Chest,
    Head,
    ArmL,
    ArmR,
    Hip,
    LegL,
    LegR,
}

impl PartId {
    /// Every part, each listed after its parent.
    pub const ALL: [PartId; 9] = [
        PartId::Root,
        PartId::Spine,
        PartId::Chest,
        PartId::Head,
        PartId::ArmL,
        PartId::ArmR,
        PartId::Hip,
        PartId::LegL,
        PartId::LegR,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PartId::Root => "root",
            PartId::Spine => "spine",
            PartId::Chest => "chest",
            PartId::Head => "head",
            PartId::ArmL => "arm_l",
            PartId::ArmR => "arm_r",
            PartId::Hip => "hip",
            PartId::LegL => "leg_l",
            PartId::LegR => "leg_r",
        }
    }

    pub fn parent(self) -> Option<PartId> {
        match self {
            PartId::Root => None,
            PartId::Spine => Some(PartId::Root),
            PartId::Chest | PartId::Hip => Some(PartId::Spine),
            PartId::Head | PartId::ArmL | PartId::ArmR => Some(PartId::Chest),
            PartId::LegL | PartId::LegR => Some(PartId::Hip),
        }
    }

    /// Offset from the parent at bind time.
    pub fn offset(self) -> Vec3 {
        match self {
            PartId::Root | PartId::Chest => Vec3::ZERO,
            PartId::Spine => Vec3::new(0.0, 4.5, 0.0),
            PartId::Head => Vec3::new(0.0, 3.5, 0.0),
            PartId::ArmL => Vec3::new(-3.5, 0.0, 0.0),
            PartId::ArmR => Vec3::new(3.5, 0.0, 0.0),
            PartId::Hip => Vec3::new(0.0, -3.5, 0.0),
            PartId::LegL => Vec3::new(-3.5, -3.5, 0.0),
            PartId::LegR => Vec3::new(3.5, -3.5, 0.0),
        }
    }

    /// The root is an invisible pivot; everything else draws a cube.
    pub fn visible(self) -> bool {
        self != PartId::Root
    }
}

/// A humanoid built from parent-linked transform nodes.
///
/// LEFT/RIGHT slide the root along x, U/J turn the chest and I/K turn the
/// hip about y.
#[derive(Debug, Clone)]
pub struct Humanoid {
    hierarchy: Hierarchy,
    /// Indexed by `PartId as usize`.
    nodes: Vec<NodeId>,
}

impl Humanoid {
    pub fn new() -> Result<Self, HierarchyError> {
        let mut hierarchy = Hierarchy::new();
        let mut nodes = Vec::with_capacity(PartId::ALL.len());
        for part in PartId::ALL {
            let parent = part.parent().map(|p| nodes[p as usize]);
            nodes.push(hierarchy.insert(Transform::from_translation(part.offset()), parent)?);
        }
        tracing::debug!(parts = PartId::ALL.len(), "built humanoid rig");
        Ok(Self { hierarchy, nodes })
    }

    pub fn node(&self, part: PartId) -> NodeId {
        self.nodes[part as usize]
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn transform(&self, part: PartId) -> Transform {
        self.hierarchy
            .get(self.node(part))
            .map(|n| n.transform)
            .unwrap_or_default()
    }

    pub fn transform_mut(&mut self, part: PartId) -> Option<&mut Transform> {
        self.hierarchy.transform_mut(self.node(part))
    }

    pub fn world_matrix(&self, part: PartId) -> Mat4 {
        self.hierarchy
            .world_matrix(self.node(part))
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Apply this frame's held keys to the local transforms.
    pub fn apply_input(&mut self, input: &dyn InputSource, config: &RigConfig) {
        let axis = |pos: Key, neg: Key| -> f32 {
            match (input.push_key(pos), input.push_key(neg)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };
        let slide = axis(Key::Right, Key::Left) * config.move_speed;
        let chest = axis(Key::U, Key::J) * config.rotate_speed;
        let hip = axis(Key::I, Key::K) * config.rotate_speed;

        if let Some(t) = self.transform_mut(PartId::Root) {
            t.translation.x += slide;
        }
        if let Some(t) = self.transform_mut(PartId::Chest) {
            t.rotation.y += chest;
        }
        if let Some(t) = self.transform_mut(PartId::Hip) {
            t.rotation.y += hip;
        }
    }

    /// Recompute every world matrix, parents first.
    pub fn update(&mut self) {
        self.hierarchy.update_all();
    }

    /// Submit one model per visible part in root-first order.
    pub fn draw(&self, sink: &mut dyn FrameSink, camera: &ViewProjection, texture: TextureHandle) {
        // Parts were inserted in `PartId::ALL` order and never reparented,
        // so node indices line up with part indices.
        for &id in self.hierarchy.update_order() {
            let part = PartId::ALL[id.index()];
            if !part.visible() {
                continue;
            }
            if let Some(world) = self.hierarchy.world_matrix(id) {
                sink.draw_model(&world, camera, texture);
            }
        }
    }

    pub fn print(&self, text: &mut DebugText, x: f32, y: f32) {
        let p = self.transform(PartId::Root).translation;
        text.print(format!("Root:({:.2},{:.2},{:.2})", p.x, p.y, p.z), x, y, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscene_input::KeyboardState;
    use rigscene_render::{FrameRecorder, Pass};

    fn held(keys: &[Key]) -> KeyboardState {
        let mut kb = KeyboardState::new();
        kb.set_held(keys.iter().copied());
        kb
    }

    fn origin(rig: &Humanoid, part: PartId) -> Vec3 {
        rig.world_matrix(part).w_axis.truncate()
    }

    #[test]
    fn parts_are_listed_after_parents() {
        for (i, part) in PartId::ALL.iter().enumerate() {
            assert_eq!(*part as usize, i);
            if let Some(parent) = part.parent() {
                assert!((parent as usize) < i);
            }
        }
    }

    #[test]
    fn bind_pose_positions() {
        let rig = Humanoid::new().unwrap();
        assert!(origin(&rig, PartId::Spine).abs_diff_eq(Vec3::new(0.0, 4.5, 0.0), 1e-6));
        assert!(origin(&rig, PartId::Head).abs_diff_eq(Vec3::new(0.0, 8.0, 0.0), 1e-6));
        assert!(origin(&rig, PartId::ArmR).abs_diff_eq(Vec3::new(3.5, 4.5, 0.0), 1e-6));
        assert!(origin(&rig, PartId::LegL).abs_diff_eq(Vec3::new(-3.5, -2.5, 0.0), 1e-6));
    }

    #[test]
    fn moving_root_carries_whole_body() {
        let mut rig = Humanoid::new().unwrap();
        let input = held(&[Key::Right]);
        for _ in 0..5 {
            rig.apply_input(&input, &RigConfig::default());
        }
        rig.update();
        let head = origin(&rig, PartId::Head);
        assert!(head.abs_diff_eq(Vec3::new(1.0, 8.0, 0.0), 1e-5));
        let leg = origin(&rig, PartId::LegR);
        assert!(leg.abs_diff_eq(Vec3::new(4.5, -2.5, 0.0), 1e-5));
    }

    #[test]
    fn chest_rotation_swings_arms_not_legs() {
        let mut rig = Humanoid::new().unwrap();
        let config = RigConfig {
            rotate_speed: std::f32::consts::FRAC_PI_2,
            ..RigConfig::default()
        };
        rig.apply_input(&held(&[Key::U]), &config);
        rig.update();
        // Arm at +x turned a quarter about y ends up at -z.
        let arm = origin(&rig, PartId::ArmR);
        assert!(arm.abs_diff_eq(Vec3::new(0.0, 4.5, -3.5), 1e-5));
        let leg = origin(&rig, PartId::LegR);
        assert!(leg.abs_diff_eq(Vec3::new(3.5, -2.5, 0.0), 1e-5));
    }

    #[test]
    fn hip_rotation_swings_legs() {
        let mut rig = Humanoid::new().unwrap();
        let config = RigConfig {
            rotate_speed: std::f32::consts::PI,
            ..RigConfig::default()
        };
        rig.apply_input(&held(&[Key::I]), &config);
        rig.update();
        let leg = origin(&rig, PartId::LegL);
        assert!(leg.abs_diff_eq(Vec3::new(3.5, -2.5, 0.0), 1e-5));
    }

    #[test]
    fn draws_visible_parts_root_first() {
        let rig = Humanoid::new().unwrap();
        let mut rec = FrameRecorder::new();
        rec.begin_pass(Pass::Model);
        rig.draw(&mut rec, &ViewProjection::default(), TextureHandle(0));
        rec.end_pass();

        let worlds: Vec<Mat4> = rec.models().map(|(m, _)| *m).collect();
        assert_eq!(worlds.len(), PartId::ALL.len() - 1);
        assert_eq!(worlds[0], rig.world_matrix(PartId::Spine));
        assert_eq!(worlds[2], rig.world_matrix(PartId::Head));
    }

    #[test]
    fn prints_root_position() {
        let rig = Humanoid::new().unwrap();
        let mut text = DebugText::new();
        rig.print(&mut text, 50.0, 230.0);
        assert_eq!(text.lines()[0].text, "Root:(0.00,0.00,0.00)");
    }
}
