//! Transform kernel: parent-linked nodes composing local SRT into world matrices.
//!
//! # Invariants
//! - `world = parent_world * local` (column vectors); roots use identity.
//! - A world matrix is only valid right after it was recomputed.
//! - Parent links are arena indices. Nodes never own their parents and
//!   parents never track their children.
//! - `Hierarchy::update_all` visits parents before children.

pub mod hierarchy;
pub mod node;

pub use hierarchy::{Hierarchy, HierarchyError};
pub use node::{NodeId, TransformNode};
