use crate::node::{NodeId, TransformNode};
use glam::Mat4;
use rigscene_common::Transform;

/// Errors from hierarchy arena operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("parenting {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
}

/// Arena owning every node of one transform hierarchy.
///
/// Keeps a root-first update order so that [`update_all`](Self::update_all)
/// always refreshes a parent before any of its descendants. Single-node
/// updates through [`update_node`](Self::update_node) leave ordering to the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<TransformNode>,
    order: Vec<NodeId>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert and initialize a node under `parent`.
    ///
    /// The world matrix is composed right away from the parent's current
    /// world matrix, so the parent should be up to date.
    pub fn insert(
        &mut self,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> Result<NodeId, HierarchyError> {
        let parent_world = match parent {
            Some(p) => Some(self.node(p)?.world_matrix()),
            None => None,
        };
        let id = NodeId(self.nodes.len() as u32);
        let mut node = TransformNode::new(transform, parent);
        node.initialize(parent_world.as_ref());
        self.nodes.push(node);
        self.order.push(id);
        tracing::debug!(node = %id, parent = ?parent, "inserted transform node");
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.nodes.get_mut(id.index())
    }

    /// Mutable access to a node's local transform.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.transform)
    }

    /// Last computed world matrix of a node.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.get(id).map(TransformNode::world_matrix)
    }

    /// Recompute a single node from its parent's current world matrix.
    ///
    /// The parent is read as-is; if it has not been updated yet this frame,
    /// the node picks up last frame's parent transform.
    pub fn update_node(&mut self, id: NodeId) -> Result<(), HierarchyError> {
        let parent = self.node(id)?.parent();
        let parent_world = match parent {
            Some(p) => Some(self.node(p)?.world_matrix()),
            None => None,
        };
        self.nodes[id.index()].update_matrix(parent_world.as_ref());
        Ok(())
    }

    /// Recompute every node, parents before children.
    pub fn update_all(&mut self) {
        for i in 0..self.order.len() {
            let id = self.order[i];
            let parent_world = self.nodes[id.index()]
                .parent()
                .map(|p| self.nodes[p.index()].world_matrix());
            self.nodes[id.index()].update_matrix(parent_world.as_ref());
        }
    }

    /// Move a node under a new parent, or make it a root.
    ///
    /// World matrices are left untouched until the next update.
    pub fn set_parent(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), HierarchyError> {
        self.node(id)?;
        if let Some(p) = parent {
            self.node(p)?;
            let mut cursor = Some(p);
            while let Some(ancestor) = cursor {
                if ancestor == id {
                    return Err(HierarchyError::Cycle { node: id, parent: p });
                }
                cursor = self.nodes[ancestor.index()].parent();
            }
        }
        self.nodes[id.index()].set_parent(parent);
        self.rebuild_order();
        tracing::debug!(node = %id, parent = ?parent, "reparented transform node");
        Ok(())
    }

    /// Number of ancestors above a node.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut cursor = self.get(id)?.parent();
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.nodes[p.index()].parent();
        }
        Some(depth)
    }

    /// The root-first order used by [`update_all`](Self::update_all).
    pub fn update_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, n)| n.parent().is_none())
            .map(|(id, _)| id)
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    fn node(&self, id: NodeId) -> Result<&TransformNode, HierarchyError> {
        self.get(id).ok_or(HierarchyError::UnknownNode(id))
    }

    fn rebuild_order(&mut self) {
        let mut keyed: Vec<(usize, NodeId)> = self
            .iter()
            .map(|(id, _)| (self.depth(id).unwrap_or(0), id))
            .collect();
        // Stable: siblings keep insertion order.
        keyed.sort_by_key(|(depth, _)| *depth);
        self.order = keyed.into_iter().map(|(_, id)| id).collect();
    }
}
