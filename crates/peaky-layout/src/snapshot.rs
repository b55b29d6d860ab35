//! Parent-pointer-free transfer form of a [`Tree`].
//!
//! A [`TreeSnapshot`] is a plain nested value, suitable for serde. Decoding
//! mints fresh node IDs but preserves pane occupancy, size weights, and the
//! zoom pointer exactly.
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "root": {
//!     "axis": "horizontal", "size": 1000,
//!     "children": [
//!       { "pane_id": "p1", "size": 600 },
//!       { "pane_id": "p2", "size": 400 }
//!     ]
//!   },
//!   "zoomed_pane_id": null
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Axis;
use crate::tree::{NodeId, NodeKind, Tree};

/// Current snapshot schema version.
pub const TREE_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

/// Serialized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub root: Option<NodeSnapshot>,
    #[serde(default)]
    pub zoomed_pane_id: Option<String>,
}

fn default_schema_version() -> u16 {
    TREE_SNAPSHOT_SCHEMA_VERSION
}

/// Serialized node. Leaves carry `pane_id`; splits carry `axis` and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    #[must_use]
    pub fn leaf(pane_id: impl Into<String>, size: u32) -> Self {
        Self {
            pane_id: Some(pane_id.into()),
            axis: None,
            size,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn split(axis: Axis, size: u32, children: Vec<NodeSnapshot>) -> Self {
        Self {
            pane_id: None,
            axis: Some(axis),
            size,
            children,
        }
    }
}

/// Snapshot decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot schema version {version} (expected {TREE_SNAPSHOT_SCHEMA_VERSION})")]
    UnsupportedSchemaVersion { version: u16 },
    #[error("node at {path} has neither a pane id nor an axis")]
    AmbiguousNode { path: String },
    #[error("node at {path} has both a pane id and an axis")]
    ConflictingNode { path: String },
    #[error("leaf at {path} has an empty pane id")]
    EmptyPaneId { path: String },
    #[error("leaf at {path} must not have children")]
    LeafWithChildren { path: String },
    #[error("split at {path} has {children} children, need at least 2")]
    DegenerateSplit { path: String, children: usize },
    #[error("pane {pane_id:?} appears more than once")]
    DuplicatePane { pane_id: String },
    #[error("zoomed pane {pane_id:?} is not in the snapshot")]
    UnknownZoomedPane { pane_id: String },
    #[error("decoded tree is invalid: {0}")]
    Invalid(#[from] crate::tree::TreeError),
}

impl Tree {
    /// Encode this tree.
    #[must_use]
    pub fn to_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            schema_version: TREE_SNAPSHOT_SCHEMA_VERSION,
            root: self.root().map(|root| self.encode_node(root)),
            zoomed_pane_id: self.zoomed_pane_id().map(str::to_string),
        }
    }

    fn encode_node(&self, id: NodeId) -> NodeSnapshot {
        let Some(record) = self.node(id) else {
            return NodeSnapshot::split(Axis::Horizontal, 0, Vec::new());
        };
        match &record.kind {
            NodeKind::Leaf { pane_id } => NodeSnapshot::leaf(pane_id.clone(), record.size),
            NodeKind::Split { axis, children } => NodeSnapshot::split(
                *axis,
                record.size,
                children.iter().map(|&child| self.encode_node(child)).collect(),
            ),
        }
    }

    /// Rebuild a live tree from `snapshot`, checking it first.
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.schema_version != TREE_SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
            });
        }

        let mut tree = Tree::empty();
        let mut seen = BTreeSet::new();
        if let Some(root) = &snapshot.root {
            let root_id = decode_node(&mut tree, root, None, "root", &mut seen)?;
            tree.set_root(Some(root_id));
        }
        if let Some(pane_id) = &snapshot.zoomed_pane_id {
            if !tree.contains_pane(pane_id) {
                return Err(SnapshotError::UnknownZoomedPane {
                    pane_id: pane_id.clone(),
                });
            }
            tree.set_zoomed(Some(pane_id.clone()));
        }
        tree.validate()?;
        Ok(tree)
    }
}

fn decode_node(
    tree: &mut Tree,
    node: &NodeSnapshot,
    parent: Option<NodeId>,
    path: &str,
    seen: &mut BTreeSet<String>,
) -> Result<NodeId, SnapshotError> {
    match (&node.pane_id, node.axis) {
        (Some(_), Some(_)) => Err(SnapshotError::ConflictingNode {
            path: path.to_string(),
        }),
        (None, None) => Err(SnapshotError::AmbiguousNode {
            path: path.to_string(),
        }),
        (Some(pane_id), None) => {
            if pane_id.trim().is_empty() {
                return Err(SnapshotError::EmptyPaneId {
                    path: path.to_string(),
                });
            }
            if !node.children.is_empty() {
                return Err(SnapshotError::LeafWithChildren {
                    path: path.to_string(),
                });
            }
            if !seen.insert(pane_id.clone()) {
                return Err(SnapshotError::DuplicatePane {
                    pane_id: pane_id.clone(),
                });
            }
            Ok(tree.insert_leaf(parent, node.size, pane_id.clone()))
        }
        (None, Some(axis)) => {
            if node.children.len() < 2 {
                return Err(SnapshotError::DegenerateSplit {
                    path: path.to_string(),
                    children: node.children.len(),
                });
            }
            let mut children = Vec::with_capacity(node.children.len());
            for (index, child) in node.children.iter().enumerate() {
                let child_path = format!("{path}.{index}");
                children.push(decode_node(tree, child, None, &child_path, seen)?);
            }
            Ok(tree.insert_split(parent, node.size, axis, children))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeSnapshot {
        TreeSnapshot {
            schema_version: TREE_SNAPSHOT_SCHEMA_VERSION,
            root: Some(NodeSnapshot::split(
                Axis::Horizontal,
                1000,
                vec![
                    NodeSnapshot::leaf("p1", 600),
                    NodeSnapshot::split(
                        Axis::Vertical,
                        400,
                        vec![NodeSnapshot::leaf("p2", 1), NodeSnapshot::leaf("p3", 3)],
                    ),
                ],
            )),
            zoomed_pane_id: Some("p3".into()),
        }
    }

    #[test]
    fn decode_then_encode_is_stable() {
        let snapshot = sample();
        let tree = Tree::from_snapshot(&snapshot).unwrap();
        assert_eq!(tree.to_snapshot(), snapshot);
        assert_eq!(tree.zoomed_pane_id(), Some("p3"));
        assert_eq!(tree.pane_ids(), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn empty_tree_round_trips() {
        let snapshot = Tree::empty().to_snapshot();
        assert_eq!(snapshot.root, None);
        assert!(Tree::from_snapshot(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn json_shape_omits_empty_fields() {
        let json = serde_json::to_value(Tree::single("solo", 1000).to_snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "schema_version": 1,
                "root": { "pane_id": "solo", "size": 1000 },
                "zoomed_pane_id": null,
            })
        );
    }

    #[test]
    fn rejects_unknown_version() {
        let mut snapshot = sample();
        snapshot.schema_version = 9;
        assert_eq!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::UnsupportedSchemaVersion { version: 9 })
        );
    }

    #[test]
    fn rejects_duplicate_panes() {
        let snapshot = TreeSnapshot {
            schema_version: TREE_SNAPSHOT_SCHEMA_VERSION,
            root: Some(NodeSnapshot::split(
                Axis::Vertical,
                1000,
                vec![NodeSnapshot::leaf("a", 1), NodeSnapshot::leaf("a", 1)],
            )),
            zoomed_pane_id: None,
        };
        assert!(matches!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::DuplicatePane { .. })
        ));
    }

    #[test]
    fn rejects_malformed_nodes() {
        let mut snapshot = sample();
        snapshot.root = Some(NodeSnapshot::split(
            Axis::Vertical,
            1000,
            vec![NodeSnapshot::leaf("a", 1)],
        ));
        assert!(matches!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::DegenerateSplit { children: 1, .. })
        ));

        let mut leaf = NodeSnapshot::leaf("a", 1);
        leaf.axis = Some(Axis::Vertical);
        snapshot.root = Some(leaf);
        assert!(matches!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::ConflictingNode { .. })
        ));

        let mut leaf = NodeSnapshot::leaf("a", 1);
        leaf.children.push(NodeSnapshot::leaf("b", 1));
        snapshot.root = Some(leaf);
        snapshot.zoomed_pane_id = None;
        assert_eq!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::LeafWithChildren {
                path: "root".into()
            })
        );
    }

    #[test]
    fn rejects_dangling_zoom() {
        let mut snapshot = sample();
        snapshot.zoomed_pane_id = Some("ghost".into());
        assert!(matches!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::UnknownZoomedPane { .. })
        ));
    }

    #[test]
    fn nested_error_paths_point_at_node() {
        let mut snapshot = sample();
        if let Some(root) = snapshot.root.as_mut() {
            root.children[1].children[0].pane_id = Some(String::new());
        }
        assert_eq!(
            Tree::from_snapshot(&snapshot),
            Err(SnapshotError::EmptyPaneId {
                path: "root.1.0".into()
            })
        );
    }
}
