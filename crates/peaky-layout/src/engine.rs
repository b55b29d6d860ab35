//! Mutation engine: the only way to change a live pane tree.
//!
//! [`Engine::apply`] runs one [`Op`] against a working clone of the tree,
//! validates the clone, and only then swaps it in. A rejected operation
//! leaves the live tree and the history untouched; an accepted one that
//! changed something pushes the previous tree onto [`History`].
//!
//! # Operations
//!
//! | Op | Effect | Affected panes |
//! |----|--------|----------------|
//! | `Resize` | Moves the boundary between two adjacent children of the nearest matching split | Panes inside the two children |
//! | `Split` | Replaces a leaf with a two-child split holding the leaf and a new pane | The target and the new pane |
//! | `Close` | Removes a leaf, promoting its sibling when the parent had two children | Closed pane and panes that grew |
//! | `ResetSizes` | Evens out every split in a subtree (clears history) | Panes in the subtree |
//! | `Swap` | Exchanges which leaf two panes occupy | Both panes |
//! | `Zoom` | Sets or toggles the view-only zoom pointer | Every pane |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Constraints, EngineConfig};
use crate::error::LayoutError;
use crate::geometry::{Axis, Rect, normalize_sizes, split_evenly};
use crate::history::History;
use crate::snap::{SnapConfig, SnapState, snap_position_with_targets};
use crate::tree::{NodeId, NodeKind, Tree, TreeError};

/// Which side of a pane is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Left,
    Right,
    Up,
    Down,
}

impl ResizeEdge {
    /// Axis of the split whose boundary this edge moves.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// `true` for edges on the leading side (left, up).
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tree mutation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Resize {
        pane_id: String,
        edge: ResizeEdge,
        /// Boundary movement in logical units; positive moves right/down.
        delta: i32,
        #[serde(default)]
        snap: bool,
        #[serde(default)]
        snap_state: SnapState,
    },
    Split {
        pane_id: String,
        new_pane_id: String,
        axis: Axis,
        /// Share of the new pane; values outside `1..=99` mean 50.
        #[serde(default)]
        percent: u32,
    },
    Close {
        pane_id: String,
    },
    ResetSizes {
        #[serde(default)]
        pane_id: Option<String>,
    },
    Swap {
        pane_a: String,
        pane_b: String,
    },
    Zoom {
        pane_id: String,
        #[serde(default)]
        toggle: bool,
    },
}

/// Discriminant of [`Op`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Resize,
    Split,
    Close,
    ResetSizes,
    Swap,
    Zoom,
}

impl OpKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Split => "split",
            Self::Close => "close",
            Self::ResetSizes => "reset_sizes",
            Self::Swap => "swap",
            Self::Zoom => "zoom",
        }
    }
}

impl Op {
    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            Self::Resize { .. } => OpKind::Resize,
            Self::Split { .. } => OpKind::Split,
            Self::Close { .. } => OpKind::Close,
            Self::ResetSizes { .. } => OpKind::ResetSizes,
            Self::Swap { .. } => OpKind::Swap,
            Self::Zoom { .. } => OpKind::Zoom,
        }
    }

    #[must_use]
    pub fn resize(pane_id: impl Into<String>, edge: ResizeEdge, delta: i32) -> Self {
        Self::Resize {
            pane_id: pane_id.into(),
            edge,
            delta,
            snap: false,
            snap_state: SnapState::default(),
        }
    }

    #[must_use]
    pub fn resize_snapped(
        pane_id: impl Into<String>,
        edge: ResizeEdge,
        delta: i32,
        snap_state: SnapState,
    ) -> Self {
        Self::Resize {
            pane_id: pane_id.into(),
            edge,
            delta,
            snap: true,
            snap_state,
        }
    }

    #[must_use]
    pub fn split(
        pane_id: impl Into<String>,
        new_pane_id: impl Into<String>,
        axis: Axis,
        percent: u32,
    ) -> Self {
        Self::Split {
            pane_id: pane_id.into(),
            new_pane_id: new_pane_id.into(),
            axis,
            percent,
        }
    }

    #[must_use]
    pub fn close(pane_id: impl Into<String>) -> Self {
        Self::Close {
            pane_id: pane_id.into(),
        }
    }

    #[must_use]
    pub fn reset_all() -> Self {
        Self::ResetSizes { pane_id: None }
    }

    #[must_use]
    pub fn reset_around(pane_id: impl Into<String>) -> Self {
        Self::ResetSizes {
            pane_id: Some(pane_id.into()),
        }
    }

    #[must_use]
    pub fn swap(pane_a: impl Into<String>, pane_b: impl Into<String>) -> Self {
        Self::Swap {
            pane_a: pane_a.into(),
            pane_b: pane_b.into(),
        }
    }

    #[must_use]
    pub fn zoom(pane_id: impl Into<String>, toggle: bool) -> Self {
        Self::Zoom {
            pane_id: pane_id.into(),
            toggle,
        }
    }
}

/// Outcome of a successful [`Engine::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyResult {
    pub changed: bool,
    pub snapped: bool,
    /// Snap lock to pass into the next resize of the same drag.
    pub snap_state: SnapState,
    /// Panes whose rectangles may differ, for redraw decisions.
    pub affected: Vec<String>,
}

impl ApplyResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(affected: Vec<String>) -> Self {
        Self {
            changed: true,
            affected,
            ..Self::default()
        }
    }
}

/// Owns the live tree together with its constraints, snap tuning and history.
#[derive(Debug, Clone)]
pub struct Engine {
    tree: Option<Tree>,
    constraints: Constraints,
    snap: SnapConfig,
    history: History,
}

impl Engine {
    /// Wrap `tree` with the default configuration.
    #[must_use]
    pub fn new(tree: Tree) -> Self {
        Self::with_config(tree, &EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(tree: Tree, config: &EngineConfig) -> Self {
        let mut engine = Self::detached(config);
        engine.tree = Some(tree);
        engine
    }

    /// An engine with no tree; [`Engine::apply`] fails until one is attached.
    #[must_use]
    pub fn detached(config: &EngineConfig) -> Self {
        Self {
            tree: None,
            constraints: config.constraints,
            snap: config.snap.clone(),
            history: History::new(config.history_limit),
        }
    }

    /// Install a new tree, discarding history. Returns the previous tree.
    pub fn attach(&mut self, tree: Tree) -> Option<Tree> {
        self.history.clear();
        self.tree.replace(tree)
    }

    /// Remove the tree, discarding history.
    pub fn detach(&mut self) -> Option<Tree> {
        self.history.clear();
        self.tree.take()
    }

    #[must_use]
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
    }

    #[must_use]
    pub fn snap_config(&self) -> &SnapConfig {
        &self.snap
    }

    pub fn set_snap_config(&mut self, snap: SnapConfig) {
        self.snap = snap;
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Pane rectangles of the live tree; empty without a tree.
    #[must_use]
    pub fn rects(&self) -> BTreeMap<String, Rect> {
        self.tree.as_ref().map(Tree::rects).unwrap_or_default()
    }

    /// Zoom-aware rectangles of the live tree; empty without a tree.
    #[must_use]
    pub fn view_rects(&self) -> BTreeMap<String, Rect> {
        self.tree.as_ref().map(Tree::view_rects).unwrap_or_default()
    }

    /// Apply one operation atomically.
    pub fn apply(&mut self, op: Op) -> Result<ApplyResult, LayoutError> {
        let kind = op.kind();
        let _span = tracing::debug_span!("layout.apply", op = kind.as_str()).entered();

        let Some(live) = self.tree.as_ref() else {
            tracing::debug!(error = %LayoutError::NoTree, "layout op rejected");
            return Err(LayoutError::NoTree);
        };
        let before_hash = live.state_hash();
        let mut working = live.clone();

        let outcome = apply_op(&mut working, op, self.constraints, &self.snap).and_then(|result| {
            working.validate()?;
            Ok(result)
        });
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(error = %err, before_hash, "layout op rejected");
                return Err(err);
            }
        };

        let after_hash = working.state_hash();
        if result.changed
            && let Some(live) = self.tree.as_mut()
        {
            let before = std::mem::replace(live, working);
            self.history.record(before);
        }
        if kind == OpKind::ResetSizes {
            self.history.clear();
        }

        tracing::debug!(
            changed = result.changed,
            snapped = result.snapped,
            affected = result.affected.len(),
            before_hash,
            after_hash,
            "layout op applied"
        );
        Ok(result)
    }

    /// Restore the tree as it was before the last change. Returns `false`
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        match self.history.undo(tree) {
            Some(previous) => {
                *tree = previous;
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone change.
    pub fn redo(&mut self) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        match self.history.redo(tree) {
            Some(next) => {
                *tree = next;
                true
            }
            None => false,
        }
    }
}

fn apply_op(
    tree: &mut Tree,
    op: Op,
    constraints: Constraints,
    snap: &SnapConfig,
) -> Result<ApplyResult, LayoutError> {
    match op {
        Op::Resize {
            pane_id,
            edge,
            delta,
            snap: use_snap,
            snap_state,
        } => {
            require_id("pane_id", &pane_id)?;
            let snap = use_snap.then_some((snap, snap_state));
            resize(tree, &pane_id, edge, delta, constraints, snap)
        }
        Op::Split {
            pane_id,
            new_pane_id,
            axis,
            percent,
        } => {
            require_id("pane_id", &pane_id)?;
            require_id("new_pane_id", &new_pane_id)?;
            let leaf = find_leaf(tree, &pane_id)?;
            if tree.contains_pane(&new_pane_id) {
                return Err(LayoutError::PaneExists {
                    pane_id: new_pane_id,
                });
            }
            split_leaf(
                tree,
                leaf,
                new_pane_id.clone(),
                axis,
                percent,
                constraints.min_for(axis),
            )?;
            Ok(ApplyResult::changed(vec![pane_id, new_pane_id]))
        }
        Op::Close { pane_id } => {
            require_id("pane_id", &pane_id)?;
            close(tree, &pane_id)
        }
        Op::ResetSizes { pane_id } => {
            let target = match pane_id {
                Some(pane_id) => {
                    require_id("pane_id", &pane_id)?;
                    let leaf = find_leaf(tree, &pane_id)?;
                    tree.node(leaf).and_then(|r| r.parent).unwrap_or(leaf)
                }
                None => match tree.root() {
                    Some(root) => root,
                    None => return Ok(ApplyResult::unchanged()),
                },
            };
            let rect = node_rect(tree, target)?;
            let changed = reset_node_sizes(tree, target, rect, constraints)?;
            Ok(ApplyResult {
                changed,
                affected: tree.panes_under(target),
                ..ApplyResult::default()
            })
        }
        Op::Swap { pane_a, pane_b } => {
            require_id("pane_a", &pane_a)?;
            require_id("pane_b", &pane_b)?;
            if pane_a == pane_b {
                return Ok(ApplyResult::unchanged());
            }
            let leaf_a = find_leaf(tree, &pane_a)?;
            let leaf_b = find_leaf(tree, &pane_b)?;
            tree.set_leaf_pane(leaf_a, pane_b.clone());
            tree.set_leaf_pane(leaf_b, pane_a.clone());
            Ok(ApplyResult::changed(vec![pane_a, pane_b]))
        }
        Op::Zoom { pane_id, toggle } => {
            require_id("pane_id", &pane_id)?;
            find_leaf(tree, &pane_id)?;
            if tree.zoomed_pane_id() == Some(pane_id.as_str()) {
                if !toggle {
                    return Ok(ApplyResult::unchanged());
                }
                tree.set_zoomed(None);
            } else {
                tree.set_zoomed(Some(pane_id));
            }
            Ok(ApplyResult::changed(tree.pane_ids()))
        }
    }
}

fn require_id(field: &'static str, value: &str) -> Result<(), LayoutError> {
    if value.trim().is_empty() {
        return Err(LayoutError::MissingPaneId { field });
    }
    Ok(())
}

fn find_leaf(tree: &Tree, pane_id: &str) -> Result<NodeId, LayoutError> {
    tree.leaf(pane_id).ok_or_else(|| LayoutError::UnknownPane {
        pane_id: pane_id.to_string(),
    })
}

fn node_rect(tree: &Tree, node: NodeId) -> Result<Rect, LayoutError> {
    tree.rect_of(node)
        .ok_or(LayoutError::Corrupted(TreeError::UnreachableNode { node_id: node }))
}

// ---------------------------------------------------------------------------
// Resize
// ---------------------------------------------------------------------------

/// Nearest ancestor split on `edge`'s axis with a neighbor across `edge`.
/// Returns the split and the index of the first child of the resized pair.
fn find_split_for_edge(tree: &Tree, leaf: NodeId, edge: ResizeEdge) -> Option<(NodeId, usize)> {
    let axis = edge.axis();
    let mut node = leaf;
    while let Some(parent) = tree.node(node)?.parent {
        let record = tree.node(parent)?;
        if record.axis() == Some(axis) {
            let children = record.children();
            let idx = children.iter().position(|&c| c == node)?;
            if edge.is_leading() && idx > 0 {
                return Some((parent, idx - 1));
            }
            if !edge.is_leading() && idx + 1 < children.len() {
                return Some((parent, idx));
            }
        }
        node = parent;
    }
    None
}

/// Whether resizing `node` from `current` to `span` along `axis` leaves every
/// leaf under it at `min` or more. A leaf already below `min` passes as long
/// as it does not shrink further.
fn subtree_fits(tree: &Tree, node: NodeId, span: u32, current: u32, axis: Axis, min: u32) -> bool {
    let Some(record) = tree.node(node) else {
        return false;
    };
    match &record.kind {
        NodeKind::Leaf { .. } => span >= min || span >= current,
        NodeKind::Split {
            axis: split_axis,
            children,
        } => {
            if *split_axis == axis {
                let weights = tree.child_weights(node);
                let spans = normalize_sizes(&weights, span);
                let currents = normalize_sizes(&weights, current);
                children
                    .iter()
                    .zip(spans.into_iter().zip(currents))
                    .all(|(&child, (child_span, child_current))| {
                        subtree_fits(tree, child, child_span, child_current, axis, min)
                    })
            } else {
                children
                    .iter()
                    .all(|&child| subtree_fits(tree, child, span, current, axis, min))
            }
        }
    }
}

/// Boundary positions of panes outside the resized pair, relative to the
/// pair's start, that fall strictly inside the pair's `[min, max]` range.
fn neighbor_targets(
    tree: &Tree,
    axis: Axis,
    pair_start: u32,
    total: u32,
    min: u32,
    max: u32,
    exclude: &[String],
) -> Vec<u32> {
    let end = pair_start + total;
    let mut targets: Vec<u32> = tree
        .rects()
        .iter()
        .filter(|(pane_id, _)| !exclude.contains(*pane_id))
        .flat_map(|(_, rect)| {
            let start = rect.start(axis);
            [start, start + rect.span(axis)]
        })
        .filter(|&pos| pos > pair_start && pos < end)
        .map(|pos| pos - pair_start)
        .filter(|rel| (min..=max).contains(rel))
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}

fn resize(
    tree: &mut Tree,
    pane_id: &str,
    edge: ResizeEdge,
    delta: i32,
    constraints: Constraints,
    snap: Option<(&SnapConfig, SnapState)>,
) -> Result<ApplyResult, LayoutError> {
    let leaf = find_leaf(tree, pane_id)?;
    let (split, idx) =
        find_split_for_edge(tree, leaf, edge).ok_or_else(|| LayoutError::NoResizableSplit {
            pane_id: pane_id.to_string(),
            edge,
        })?;
    let axis = edge.axis();
    let min = constraints.min_for(axis);

    let split_rect = node_rect(tree, split)?;
    let children = tree
        .node(split)
        .map(|r| r.children().to_vec())
        .unwrap_or_default();
    let spans = normalize_sizes(&tree.child_weights(split), split_rect.span(axis));
    let (Some(&first), Some(&second)) = (children.get(idx), children.get(idx + 1)) else {
        return Err(LayoutError::Corrupted(TreeError::DegenerateSplit {
            node_id: split,
            children: children.len(),
        }));
    };
    let current = spans[idx];
    let total = current + spans[idx + 1];
    let required = min.saturating_mul(2);
    if total < required {
        return Err(LayoutError::ResizeInfeasible { total, required });
    }
    let max = total - min;
    let desired = i64::from(current) + i64::from(delta);

    let mut affected = tree.panes_under(first);
    affected.extend(tree.panes_under(second));

    let (mut position, mut snapped, mut snap_state) = match snap {
        Some((config, state)) => {
            let pair_start = split_rect.start(axis) + spans[..idx].iter().sum::<u32>();
            let extra = neighbor_targets(tree, axis, pair_start, total, min, max, &affected);
            let outcome = snap_position_with_targets(config, desired, min, max, state, &extra);
            (outcome.position, outcome.snapped, outcome.state)
        }
        None => (
            desired.clamp(i64::from(min), i64::from(max)) as u32,
            false,
            SnapState::default(),
        ),
    };

    // Back off toward the current boundary until no nested pane is squeezed
    // below the minimum.
    while position != current
        && !(subtree_fits(tree, first, position, current, axis, min)
            && subtree_fits(tree, second, total - position, total - current, axis, min))
    {
        position = if position > current {
            position - 1
        } else {
            position + 1
        };
        snapped = false;
        snap_state = SnapState::default();
    }

    if position == current {
        return Ok(ApplyResult {
            snapped,
            snap_state,
            ..ApplyResult::unchanged()
        });
    }

    // Weights become absolute spans so the pair can be moved in place.
    for (&child, &span) in children.iter().zip(&spans) {
        if let Some(record) = tree.node_mut(child) {
            record.size = span;
        }
    }
    if let Some(record) = tree.node_mut(first) {
        record.size = position;
    }
    if let Some(record) = tree.node_mut(second) {
        record.size = total - position;
    }

    Ok(ApplyResult {
        changed: true,
        snapped,
        snap_state,
        affected,
    })
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Old/new spans for splitting `total` units with the new pane taking
/// `percent`. Falls back to an even split when the requested share violates
/// `min`; `None` when even that does not fit.
pub(crate) fn split_sizes(total: u32, percent: u32, min: u32) -> Option<(u32, u32)> {
    if total <= 1 {
        return None;
    }
    let pct = if percent == 0 || percent >= 100 {
        50
    } else {
        percent
    };
    let mut new = (u64::from(total) * u64::from(pct) / 100) as u32;
    if new == 0 || new >= total {
        new = total / 2;
    }
    let min = min.max(1);
    let fits = |old: u32, new: u32| old >= min && new >= min;
    if fits(total - new, new) {
        return Some((total - new, new));
    }
    if total < min.saturating_mul(2) {
        return None;
    }
    let new = total / 2;
    fits(total - new, new).then_some((total - new, new))
}

/// Replace `leaf` with a split holding `leaf` and a new leaf for `new_pane_id`.
pub(crate) fn split_leaf(
    tree: &mut Tree,
    leaf: NodeId,
    new_pane_id: String,
    axis: Axis,
    percent: u32,
    min: u32,
) -> Result<NodeId, LayoutError> {
    let rect = node_rect(tree, leaf)?;
    let span = rect.span(axis);
    let Some(record) = tree.node(leaf) else {
        return Err(LayoutError::Corrupted(TreeError::UnreachableNode { node_id: leaf }));
    };
    let (parent, size) = (record.parent, record.size);
    let pane_id = record.pane_id().unwrap_or_default().to_string();

    let (old, new) = split_sizes(span, percent, min).ok_or(LayoutError::SplitInfeasible {
        pane_id,
        span,
        min,
    })?;

    let new_leaf = tree.insert_leaf(None, new, new_pane_id);
    if let Some(record) = tree.node_mut(leaf) {
        record.size = old;
    }
    let split = tree.insert_split(parent, size, axis, vec![leaf, new_leaf]);
    if !tree.replace_child(parent, leaf, split) {
        return Err(LayoutError::Corrupted(TreeError::MissingChild {
            parent: parent.unwrap_or(split),
            child: leaf,
        }));
    }
    Ok(new_leaf)
}

// ---------------------------------------------------------------------------
// Close
// ---------------------------------------------------------------------------

fn close(tree: &mut Tree, pane_id: &str) -> Result<ApplyResult, LayoutError> {
    let leaf = find_leaf(tree, pane_id)?;
    if tree.zoomed_pane_id() == Some(pane_id) {
        tree.set_zoomed(None);
    }
    let mut affected = vec![pane_id.to_string()];

    let Some(parent) = tree.node(leaf).and_then(|r| r.parent) else {
        tree.remove_node(leaf);
        tree.set_root(None);
        return Ok(ApplyResult::changed(affected));
    };
    let Some(parent_record) = tree.node(parent) else {
        return Err(LayoutError::Corrupted(TreeError::UnreachableNode { node_id: leaf }));
    };
    let siblings: Vec<NodeId> = parent_record
        .children()
        .iter()
        .copied()
        .filter(|&c| c != leaf)
        .collect();
    let (parent_size, grandparent) = (parent_record.size, parent_record.parent);

    if siblings.len() >= 2 {
        // Multi-way split: drop the slot, remaining weights stay relative.
        if let Some(record) = tree.node_mut(parent)
            && let NodeKind::Split { children, .. } = &mut record.kind
        {
            children.retain(|&c| c != leaf);
        }
        tree.remove_node(leaf);
        affected.extend(tree.panes_under(parent));
        return Ok(ApplyResult::changed(affected));
    }

    let Some(&sibling) = siblings.first() else {
        return Err(LayoutError::MissingSibling {
            pane_id: pane_id.to_string(),
        });
    };
    tree.remove_node(leaf);
    tree.remove_node(parent);
    if let Some(record) = tree.node_mut(sibling) {
        record.size = parent_size;
    }
    if !tree.replace_child(grandparent, parent, sibling) {
        return Err(LayoutError::MissingSibling {
            pane_id: pane_id.to_string(),
        });
    }
    affected.extend(tree.panes_under(sibling));
    Ok(ApplyResult::changed(affected))
}

// ---------------------------------------------------------------------------
// ResetSizes
// ---------------------------------------------------------------------------

/// Even out every split under `node`, descending with the true rectangles.
/// Returns whether any weight changed.
fn reset_node_sizes(
    tree: &mut Tree,
    node: NodeId,
    rect: Rect,
    constraints: Constraints,
) -> Result<bool, LayoutError> {
    let Some(record) = tree.node(node) else {
        return Ok(false);
    };
    let NodeKind::Split { axis, children } = &record.kind else {
        return Ok(false);
    };
    let (axis, children) = (*axis, children.clone());

    let span = rect.span(axis);
    let count = children.len();
    let required = constraints
        .min_for(axis)
        .saturating_mul(u32::try_from(count).unwrap_or(u32::MAX));
    if span < required {
        return Err(LayoutError::ResetInfeasible {
            span,
            children: count,
            required,
        });
    }

    let sizes = split_evenly(span, count);
    let mut changed = false;
    for (&child, &size) in children.iter().zip(&sizes) {
        if let Some(record) = tree.node_mut(child)
            && record.size != size
        {
            record.size = size;
            changed = true;
        }
    }
    for (&child, child_rect) in children.iter().zip(rect.partition(axis, &sizes)) {
        changed |= reset_node_sizes(tree, child, child_rect, constraints)?;
    }
    Ok(changed)
}
