use glam::Vec3;
use rigscene_common::Transform;
use rigscene_kernel::{Hierarchy, NodeId};

/// Hierarchy inspector for developer tooling.
///
/// Provides read-only queries against a hierarchy for debugging and the
/// desktop inspector panel.
pub struct HierarchyInspector;

impl HierarchyInspector {
    /// Produce a summary of the hierarchy.
    pub fn summary(hierarchy: &Hierarchy) -> HierarchySummary {
        let max_depth = hierarchy
            .iter()
            .filter_map(|(id, _)| hierarchy.depth(id))
            .max()
            .unwrap_or(0);
        HierarchySummary {
            node_count: hierarchy.len(),
            root_count: hierarchy.roots().count(),
            max_depth,
        }
    }

    /// Local transform and world placement of one node.
    pub fn inspect_node(hierarchy: &Hierarchy, id: NodeId) -> Option<NodeInfo> {
        let node = hierarchy.get(id)?;
        Some(NodeInfo {
            id,
            parent: node.parent(),
            depth: hierarchy.depth(id)?,
            local: node.transform,
            world_origin: node.world_origin(),
        })
    }

    /// Every node in update order.
    pub fn list_nodes(hierarchy: &Hierarchy) -> Vec<NodeInfo> {
        hierarchy
            .update_order()
            .iter()
            .filter_map(|id| Self::inspect_node(hierarchy, *id))
            .collect()
    }
}

/// Summary of a hierarchy for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchySummary {
    pub node_count: usize,
    pub root_count: usize,
    pub max_depth: usize,
}

impl std::fmt::Display for HierarchySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hierarchy: nodes={} roots={} max_depth={}",
            self.node_count, self.root_count, self.max_depth
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub local: Transform,
    pub world_origin: Vec3,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parent = self
            .parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        let t = self.local.translation;
        let r = self.local.rotation;
        let w = self.world_origin;
        write!(
            f,
            "{:indent$}{} parent={} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) world=({:.2}, {:.2}, {:.2})",
            "",
            self.id,
            parent,
            t.x,
            t.y,
            t.z,
            r.x,
            r.y,
            r.z,
            w.x,
            w.y,
            w.z,
            indent = self.depth * 2,
        )
    }
}
