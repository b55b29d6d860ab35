//! Arena-backed pane split tree.
//!
//! Nodes live in a `BTreeMap` keyed by [`NodeId`]. Split nodes own their
//! children by listing child IDs; every non-root node carries its parent ID as
//! a plain back reference used for upward walks. Pane IDs map to their leaf
//! through a separate index that must always agree with the reachable leaves.
//!
//! ```text
//!   root: Split(Horizontal)            pane index
//!   ├── Leaf "p1"   size 600           "p1" -> #1
//!   └── Split(Vertical) size 400       "p2" -> #3
//!       ├── Leaf "p2" size 500         "p3" -> #4
//!       └── Leaf "p3" size 500
//! ```
//!
//! Cloning a tree copies the whole arena. Node IDs are scoped to one tree, so
//! the clone's parent links and pane index resolve against its own records.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Axis, Rect};

/// Identifier of a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf or split payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { pane_id: String },
    Split { axis: Axis, children: Vec<NodeId> },
}

/// One arena entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    /// Share of the parent's span along the parent's axis.
    pub size: u32,
    pub kind: NodeKind,
}

impl NodeRecord {
    #[must_use]
    pub fn pane_id(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { pane_id } => Some(pane_id),
            NodeKind::Split { .. } => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Split { children, .. } => children,
        }
    }

    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Split { axis, .. } => Some(*axis),
        }
    }
}

/// Structural defects found by [`Tree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("root node {root} not found")]
    MissingRoot { root: NodeId },
    #[error("root node {root} must not have parent {parent}")]
    RootHasParent { root: NodeId, parent: NodeId },
    #[error("split node {parent} references missing child {child}")]
    MissingChild { parent: NodeId, child: NodeId },
    #[error("node {node_id} reached twice while walking the tree")]
    CycleDetected { node_id: NodeId },
    #[error("node {node_id} records parent {actual:?}, expected {expected:?}")]
    ParentMismatch {
        node_id: NodeId,
        expected: Option<NodeId>,
        actual: Option<NodeId>,
    },
    #[error("split node {node_id} has {children} children, need at least 2")]
    DegenerateSplit { node_id: NodeId, children: usize },
    #[error("leaf node {node_id} has an empty pane id")]
    EmptyPaneId { node_id: NodeId },
    #[error("pane {pane_id:?} appears on more than one leaf")]
    DuplicatePane { pane_id: String },
    #[error("pane {pane_id:?} is not indexed at its leaf")]
    IndexMismatch { pane_id: String },
    #[error("pane index entry {pane_id:?} is not reachable from the root")]
    StaleIndexEntry { pane_id: String },
    #[error("node {node_id} is not reachable from the root")]
    UnreachableNode { node_id: NodeId },
    #[error("zoomed pane {pane_id:?} does not exist")]
    DanglingZoom { pane_id: String },
}

/// Pane split tree: the arena, the pane index, and the zoom pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    root: Option<NodeId>,
    nodes: BTreeMap<NodeId, NodeRecord>,
    panes: BTreeMap<String, NodeId>,
    zoomed: Option<String>,
    next_id: u64,
}

impl Tree {
    /// A tree with no root.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A tree holding one leaf as its root.
    #[must_use]
    pub fn single(pane_id: impl Into<String>, size: u32) -> Self {
        let mut tree = Self::empty();
        let root = tree.insert_leaf(None, size, pane_id.into());
        tree.root = Some(root);
        tree
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Iterate over all node records in ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values()
    }

    /// Leaf node hosting `pane_id`.
    #[must_use]
    pub fn leaf(&self, pane_id: &str) -> Option<NodeId> {
        self.panes.get(pane_id).copied()
    }

    #[must_use]
    pub fn contains_pane(&self, pane_id: &str) -> bool {
        self.panes.contains_key(pane_id)
    }

    /// All pane IDs, sorted.
    #[must_use]
    pub fn pane_ids(&self) -> Vec<String> {
        self.panes.keys().cloned().collect()
    }

    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    #[must_use]
    pub fn zoomed_pane_id(&self) -> Option<&str> {
        self.zoomed.as_deref()
    }

    /// Pane IDs of every leaf under `node`, in left-to-right tree order.
    #[must_use]
    pub fn panes_under(&self, node: NodeId) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(record) = self.nodes.get(&id) else {
                continue;
            };
            match &record.kind {
                NodeKind::Leaf { pane_id } => out.push(pane_id.clone()),
                NodeKind::Split { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Size weights of a split node's children, in order.
    #[must_use]
    pub fn child_weights(&self, node: NodeId) -> Vec<u32> {
        self.nodes
            .get(&node)
            .map(|record| {
                record
                    .children()
                    .iter()
                    .map(|child| self.nodes.get(child).map_or(0, |c| c.size))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every pane's rectangle within the standard root space.
    #[must_use]
    pub fn rects(&self) -> BTreeMap<String, Rect> {
        self.rects_within(Rect::root())
    }

    /// Every pane's rectangle when the root occupies `bounds`.
    ///
    /// Branches whose rectangle collapses to zero width or height are skipped.
    #[must_use]
    pub fn rects_within(&self, bounds: Rect) -> BTreeMap<String, Rect> {
        let mut out = BTreeMap::new();
        if let Some(root) = self.root {
            self.collect_rects(root, bounds, &mut out);
        }
        out
    }

    fn collect_rects(&self, node: NodeId, rect: Rect, out: &mut BTreeMap<String, Rect>) {
        if rect.is_empty() {
            return;
        }
        let Some(record) = self.nodes.get(&node) else {
            return;
        };
        match &record.kind {
            NodeKind::Leaf { pane_id } => {
                out.insert(pane_id.clone(), rect);
            }
            NodeKind::Split { axis, children } => {
                let parts = rect.partition(*axis, &self.child_weights(node));
                for (child, part) in children.iter().zip(parts) {
                    self.collect_rects(*child, part, out);
                }
            }
        }
    }

    /// Rectangles as displayed: only the zoomed pane at full size when a zoom
    /// is active, otherwise identical to [`Tree::rects`].
    #[must_use]
    pub fn view_rects(&self) -> BTreeMap<String, Rect> {
        match &self.zoomed {
            Some(pane_id) if self.panes.contains_key(pane_id) => {
                BTreeMap::from([(pane_id.clone(), Rect::root())])
            }
            _ => self.rects(),
        }
    }

    /// Absolute rectangle of a single node, derived by walking parent links.
    #[must_use]
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        let mut path = vec![node];
        let mut cursor = self.nodes.get(&node)?.parent;
        while let Some(parent) = cursor {
            if path.len() > self.nodes.len() {
                return None;
            }
            path.push(parent);
            cursor = self.nodes.get(&parent)?.parent;
        }
        if path.last().copied() != self.root {
            return None;
        }

        let mut rect = Rect::root();
        for pair in path.windows(2).rev() {
            let (child, parent) = (pair[0], pair[1]);
            let record = self.nodes.get(&parent)?;
            let axis = record.axis()?;
            let index = record.children().iter().position(|&c| c == child)?;
            rect = *rect
                .partition(axis, &self.child_weights(parent))
                .get(index)?;
        }
        Some(rect)
    }

    /// Rectangle of the leaf hosting `pane_id`.
    #[must_use]
    pub fn pane_rect(&self, pane_id: &str) -> Option<Rect> {
        self.rect_of(self.leaf(pane_id)?)
    }

    /// Check every structural invariant of the arena and pane index.
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            if let Some(node_id) = self.nodes.keys().next() {
                return Err(TreeError::UnreachableNode { node_id: *node_id });
            }
            if let Some(pane_id) = self.panes.keys().next() {
                return Err(TreeError::StaleIndexEntry {
                    pane_id: pane_id.clone(),
                });
            }
            if let Some(pane_id) = &self.zoomed {
                return Err(TreeError::DanglingZoom {
                    pane_id: pane_id.clone(),
                });
            }
            return Ok(());
        };

        let root_record = self
            .nodes
            .get(&root)
            .ok_or(TreeError::MissingRoot { root })?;
        if let Some(parent) = root_record.parent {
            return Err(TreeError::RootHasParent { root, parent });
        }

        let mut visited = BTreeSet::new();
        let mut leaves = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(TreeError::CycleDetected { node_id: id });
            }
            let Some(record) = self.nodes.get(&id) else {
                continue;
            };
            match &record.kind {
                NodeKind::Leaf { pane_id } => {
                    if pane_id.trim().is_empty() {
                        return Err(TreeError::EmptyPaneId { node_id: id });
                    }
                    if !leaves.insert(pane_id.as_str()) {
                        return Err(TreeError::DuplicatePane {
                            pane_id: pane_id.clone(),
                        });
                    }
                    if self.panes.get(pane_id) != Some(&id) {
                        return Err(TreeError::IndexMismatch {
                            pane_id: pane_id.clone(),
                        });
                    }
                }
                NodeKind::Split { children, .. } => {
                    if children.len() < 2 {
                        return Err(TreeError::DegenerateSplit {
                            node_id: id,
                            children: children.len(),
                        });
                    }
                    for &child in children {
                        let child_record = self.nodes.get(&child).ok_or(
                            TreeError::MissingChild {
                                parent: id,
                                child,
                            },
                        )?;
                        if child_record.parent != Some(id) {
                            return Err(TreeError::ParentMismatch {
                                node_id: child,
                                expected: Some(id),
                                actual: child_record.parent,
                            });
                        }
                        stack.push(child);
                    }
                }
            }
        }

        if let Some(node_id) = self.nodes.keys().find(|id| !visited.contains(id)) {
            return Err(TreeError::UnreachableNode { node_id: *node_id });
        }
        if let Some(pane_id) = self
            .panes
            .keys()
            .find(|pane_id| !leaves.contains(pane_id.as_str()))
        {
            return Err(TreeError::StaleIndexEntry {
                pane_id: pane_id.clone(),
            });
        }
        if let Some(pane_id) = &self.zoomed
            && !self.panes.contains_key(pane_id)
        {
            return Err(TreeError::DanglingZoom {
                pane_id: pane_id.clone(),
            });
        }
        Ok(())
    }

    /// Deterministic FNV-1a hash of shape, sizes, occupancy, and zoom.
    ///
    /// Node IDs are excluded, so a tree and its snapshot reconstruction hash
    /// identically.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_bytes(hash, &(value.len() as u64).to_le_bytes());
            mix_bytes(hash, value.as_bytes());
        }

        let mut hash = OFFSET_BASIS;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(record) = self.nodes.get(&id) else {
                continue;
            };
            mix_bytes(&mut hash, &record.size.to_le_bytes());
            match &record.kind {
                NodeKind::Leaf { pane_id } => {
                    mix_bytes(&mut hash, &[1]);
                    mix_str(&mut hash, pane_id);
                }
                NodeKind::Split { axis, children } => {
                    mix_bytes(&mut hash, &[2]);
                    mix_str(&mut hash, axis.as_str());
                    mix_bytes(&mut hash, &(children.len() as u64).to_le_bytes());
                    stack.extend(children.iter().rev());
                }
            }
        }
        match &self.zoomed {
            Some(pane_id) => {
                mix_bytes(&mut hash, &[3]);
                mix_str(&mut hash, pane_id);
            }
            None => mix_bytes(&mut hash, &[0]),
        }
        hash
    }

    // ---- mutation primitives (crate-internal; callers go through the engine) ----

    fn mint_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(crate) fn insert_leaf(&mut self, parent: Option<NodeId>, size: u32, pane_id: String) -> NodeId {
        let id = self.mint_id();
        self.panes.insert(pane_id.clone(), id);
        self.nodes.insert(
            id,
            NodeRecord {
                id,
                parent,
                size,
                kind: NodeKind::Leaf { pane_id },
            },
        );
        id
    }

    pub(crate) fn insert_split(
        &mut self,
        parent: Option<NodeId>,
        size: u32,
        axis: Axis,
        children: Vec<NodeId>,
    ) -> NodeId {
        let id = self.mint_id();
        for child in &children {
            if let Some(record) = self.nodes.get_mut(child) {
                record.parent = Some(id);
            }
        }
        self.nodes.insert(
            id,
            NodeRecord {
                id,
                parent,
                size,
                kind: NodeKind::Split { axis, children },
            },
        );
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<NodeRecord> {
        let record = self.nodes.remove(&id)?;
        if let NodeKind::Leaf { pane_id } = &record.kind
            && self.panes.get(pane_id) == Some(&id)
        {
            self.panes.remove(pane_id);
        }
        Some(record)
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        if let Some(id) = root
            && let Some(record) = self.nodes.get_mut(&id)
        {
            record.parent = None;
        }
    }

    /// Replace `old` with `new` in `parent`'s child list, or at the root.
    pub(crate) fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) -> bool {
        match parent {
            None => {
                self.set_root(Some(new));
                true
            }
            Some(parent_id) => {
                let Some(NodeRecord {
                    kind: NodeKind::Split { children, .. },
                    ..
                }) = self.nodes.get_mut(&parent_id)
                else {
                    return false;
                };
                let Some(slot) = children.iter_mut().find(|c| **c == old) else {
                    return false;
                };
                *slot = new;
                if let Some(record) = self.nodes.get_mut(&new) {
                    record.parent = Some(parent_id);
                }
                true
            }
        }
    }

    pub(crate) fn set_leaf_pane(&mut self, leaf: NodeId, pane_id: String) {
        if let Some(NodeRecord {
            kind: NodeKind::Leaf { pane_id: slot },
            ..
        }) = self.nodes.get_mut(&leaf)
        {
            *slot = pane_id.clone();
            self.panes.insert(pane_id, leaf);
        }
    }

    pub(crate) fn set_zoomed(&mut self, pane_id: Option<String>) {
        self.zoomed = pane_id;
    }
}
