use glam::{Mat4, Vec3};
use rigscene_common::Transform;

/// Index of a node inside the [`Hierarchy`](crate::Hierarchy) that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in the transform hierarchy.
///
/// Holds a local SRT transform, an optional back-link to its parent and the
/// last computed world matrix. The world matrix goes stale as soon as the
/// local transform or any ancestor changes; nothing tracks that.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub transform: Transform,
    parent: Option<NodeId>,
    world_matrix: Mat4,
}

impl TransformNode {
    /// Create a node. The world matrix is identity until [`initialize`](Self::initialize).
    pub fn new(transform: Transform, parent: Option<NodeId>) -> Self {
        Self {
            transform,
            parent,
            world_matrix: Mat4::IDENTITY,
        }
    }

    /// Compute the world matrix for the first time.
    ///
    /// `parent_world` must already be valid for this frame, or `None` for a root.
    pub fn initialize(&mut self, parent_world: Option<&Mat4>) {
        self.update_matrix(parent_world);
    }

    /// Recompute the world matrix from the local transform and the parent's
    /// current world matrix.
    ///
    /// Passing a parent matrix that has not been refreshed this frame yields a
    /// world matrix that lags the parent by one frame.
    pub fn update_matrix(&mut self, parent_world: Option<&Mat4>) {
        let local = self.transform.local_matrix();
        self.world_matrix = match parent_world {
            Some(parent) => *parent * local,
            None => local,
        };
    }

    /// The last computed world matrix.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Where the node's local origin lands in world space.
    pub fn world_origin(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transform {
        Transform {
            scale: Vec3::new(2.0, 1.0, 0.5),
            rotation: Vec3::new(0.3, -0.7, 1.1),
            translation: Vec3::new(4.0, -2.0, 9.0),
        }
    }

    #[test]
    fn new_node_starts_at_identity() {
        let node = TransformNode::new(sample(), None);
        assert_eq!(node.world_matrix(), Mat4::IDENTITY);
        assert!(node.parent().is_none());
    }

    #[test]
    fn root_world_equals_local() {
        let mut node = TransformNode::new(sample(), None);
        node.update_matrix(None);
        assert_eq!(node.world_matrix(), sample().local_matrix());
    }

    #[test]
    fn identity_parent_contributes_nothing() {
        let mut node = TransformNode::new(sample(), None);
        node.update_matrix(Some(&Mat4::IDENTITY));
        assert!(node.world_matrix().abs_diff_eq(sample().local_matrix(), 1e-6));
    }

    #[test]
    fn parent_translation_is_added() {
        let parent = Mat4::from_translation(Vec3::new(0.0, 4.5, 0.0));
        let mut node = TransformNode::new(Transform::from_translation(Vec3::new(0.0, 3.5, 0.0)), None);
        node.initialize(Some(&parent));
        assert!(node.world_origin().abs_diff_eq(Vec3::new(0.0, 8.0, 0.0), 1e-6));
    }

    #[test]
    fn update_is_idempotent() {
        let mut node = TransformNode::new(sample(), None);
        node.update_matrix(None);
        let first = node.world_matrix();
        node.update_matrix(None);
        assert_eq!(first, node.world_matrix());
    }
}
