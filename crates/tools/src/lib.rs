//! Developer tooling: read-only views of a transform hierarchy.

mod inspector;

pub use inspector::{HierarchyInspector, HierarchySummary, NodeInfo};
