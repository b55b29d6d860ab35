//! Initial tree construction from a layout description.
//!
//! Two shapes are supported:
//!
//! - **Grid** (`"RxC"`): `R` rows of `C` columns. A multi-row grid is a
//!   vertical split of horizontal rows; a single row or column collapses to
//!   one split, and `1x1` is a lone leaf. Panes are assigned row-major.
//! - **Split sequence**: the first pane becomes the root, and every following
//!   pane splits the most recently added one along its directive's axis.
//!
//! ```text
//!   grid "2x3"                      splits [_, v 30%, h 50%]
//!   ┌────┬────┬────┐                ┌──────────────┐
//!   │ p1 │ p2 │ p3 │                │      p1      │
//!   ├────┼────┼────┤                ├───────┬──────┤
//!   │ p4 │ p5 │ p6 │                │  p2   │  p3  │
//!   └────┴────┴────┘                └───────┴──────┘
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::split_leaf;
use crate::error::LayoutError;
use crate::geometry::{Axis, LAYOUT_BASE_SIZE, split_evenly};
use crate::tree::{NodeId, Tree};

/// Minimum pane span used while building. Engine constraints apply only to
/// later mutations.
const BUILD_MIN_SIZE: u32 = 1;

/// Errors from [`build_tree`] and layout parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("layout: no panes defined")]
    NoPanes,
    #[error("layout: parse grid {spec:?}: {reason}")]
    InvalidGrid { spec: String, reason: &'static str },
    #[error("layout: need {needed} pane ids, got {got}")]
    NotEnoughPaneIds { needed: usize, got: usize },
    #[error("layout: pane id at position {index} is empty")]
    EmptyPaneId { index: usize },
    #[error("layout: pane id {pane_id:?} is listed more than once")]
    DuplicatePaneId { pane_id: String },
    #[error(transparent)]
    Split(#[from] LayoutError),
}

/// Parsed `"RxC"` grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
}

impl GridSpec {
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Parse `"RxC"`; whitespace around either number and an uppercase `X`
    /// are accepted.
    pub fn parse(raw: &str) -> Result<Self, BuildError> {
        let invalid = |reason| BuildError::InvalidGrid {
            spec: raw.to_string(),
            reason,
        };
        let (rows, columns) = raw
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| invalid("expected ROWSxCOLUMNS"))?;
        let rows: u32 = rows
            .trim()
            .parse()
            .map_err(|_| invalid("rows is not a number"))?;
        let columns: u32 = columns
            .trim()
            .parse()
            .map_err(|_| invalid("columns is not a number"))?;
        let grid = Self { rows, columns };
        grid.check().map_err(invalid)?;
        Ok(grid)
    }

    /// Both dimensions must be positive and fit the layout space.
    fn check(self) -> Result<(), &'static str> {
        if self.rows == 0 || self.columns == 0 {
            return Err("dimensions must be positive");
        }
        if self.rows > LAYOUT_BASE_SIZE || self.columns > LAYOUT_BASE_SIZE {
            return Err("dimensions exceed the layout space");
        }
        Ok(())
    }

    /// Number of panes the grid needs.
    #[must_use]
    pub fn pane_count(self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

impl FromStr for GridSpec {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// One step of a split sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitDirective {
    pub axis: Axis,
    /// Share of the new pane; `0` (or anything outside `1..=99`) means 50.
    pub percent: u32,
}

impl SplitDirective {
    #[must_use]
    pub const fn new(axis: Axis, percent: u32) -> Self {
        Self { axis, percent }
    }

    /// Interpret the loose strings of a [`PaneDef`].
    #[must_use]
    pub fn from_def(def: &PaneDef) -> Self {
        Self {
            axis: Axis::from_directive(&def.split),
            percent: parse_percent(&def.size),
        }
    }
}

/// `"30%"` or `"30"` -> 30. Blank, malformed, or out-of-range input -> 0.
fn parse_percent(raw: &str) -> u32 {
    let raw = raw.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw).trim();
    match raw.parse::<i64>() {
        Ok(pct) if (1..100).contains(&pct) => pct as u32,
        _ => 0,
    }
}

/// Pane entry of a serialized layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneDef {
    /// `"horizontal"` / `"vertical"` (or `"h"` / `"v"`).
    pub split: String,
    /// Size of the new pane, e.g. `"30%"`.
    pub size: String,
}

/// Serialized layout description as it appears in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub panes: Vec<PaneDef>,
}

/// Validated layout shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSpec {
    Grid(GridSpec),
    /// The first directive stands for the root pane; its fields are ignored.
    Splits(Vec<SplitDirective>),
}

impl LayoutSpec {
    /// A non-blank grid wins over the pane list.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, BuildError> {
        if let Some(grid) = config.grid.as_deref()
            && !grid.trim().is_empty()
        {
            return GridSpec::parse(grid).map(Self::Grid);
        }
        if config.panes.is_empty() {
            return Err(BuildError::NoPanes);
        }
        Ok(Self::Splits(
            config.panes.iter().map(SplitDirective::from_def).collect(),
        ))
    }

    #[must_use]
    pub fn pane_count(&self) -> usize {
        match self {
            Self::Grid(grid) => grid.pane_count(),
            Self::Splits(steps) => steps.len(),
        }
    }
}

/// Build a tree for `spec`, assigning `pane_ids` in creation order.
///
/// Extra IDs beyond what the layout needs are ignored.
pub fn build_tree<S: AsRef<str>>(spec: &LayoutSpec, pane_ids: &[S]) -> Result<Tree, BuildError> {
    if let LayoutSpec::Grid(grid) = spec {
        grid.check().map_err(|reason| BuildError::InvalidGrid {
            spec: grid.to_string(),
            reason,
        })?;
    }
    let needed = spec.pane_count();
    if needed == 0 {
        return Err(BuildError::NoPanes);
    }
    if pane_ids.len() < needed {
        return Err(BuildError::NotEnoughPaneIds {
            needed,
            got: pane_ids.len(),
        });
    }
    let ids: Vec<String> = pane_ids[..needed]
        .iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    let mut seen = BTreeSet::new();
    for (index, id) in ids.iter().enumerate() {
        if id.trim().is_empty() {
            return Err(BuildError::EmptyPaneId { index });
        }
        if !seen.insert(id.as_str()) {
            return Err(BuildError::DuplicatePaneId {
                pane_id: id.clone(),
            });
        }
    }

    let tree = match spec {
        LayoutSpec::Grid(grid) => build_grid(*grid, ids),
        LayoutSpec::Splits(steps) => build_splits(steps, ids)?,
    };
    tracing::debug!(
        panes = tree.pane_count(),
        nodes = tree.nodes().count(),
        "built layout tree"
    );
    Ok(tree)
}

fn build_grid(grid: GridSpec, ids: Vec<String>) -> Tree {
    let mut tree = Tree::empty();
    let mut ids = ids.into_iter();
    let columns = grid.columns as usize;

    let root = if grid.rows == 1 {
        build_row(&mut tree, columns, LAYOUT_BASE_SIZE, &mut ids)
    } else {
        let rows: Vec<NodeId> = split_evenly(LAYOUT_BASE_SIZE, grid.rows as usize)
            .into_iter()
            .map(|height| build_row(&mut tree, columns, height, &mut ids))
            .collect();
        tree.insert_split(None, LAYOUT_BASE_SIZE, Axis::Vertical, rows)
    };
    tree.set_root(Some(root));
    tree
}

/// One grid row: a horizontal split of `columns` leaves, or a lone leaf.
fn build_row(
    tree: &mut Tree,
    columns: usize,
    size: u32,
    ids: &mut impl Iterator<Item = String>,
) -> NodeId {
    let leaves: Vec<NodeId> = split_evenly(LAYOUT_BASE_SIZE, columns)
        .into_iter()
        .map(|width| tree.insert_leaf(None, width, ids.next().unwrap_or_default()))
        .collect();
    if let [leaf] = leaves[..] {
        if let Some(record) = tree.node_mut(leaf) {
            record.size = size;
        }
        return leaf;
    }
    tree.insert_split(None, size, Axis::Horizontal, leaves)
}

fn build_splits(steps: &[SplitDirective], ids: Vec<String>) -> Result<Tree, BuildError> {
    let mut ids = ids.into_iter();
    let Some(first) = ids.next() else {
        return Err(BuildError::NoPanes);
    };
    let mut tree = Tree::single(first, LAYOUT_BASE_SIZE);
    let mut active = tree.root();

    for (step, pane_id) in steps.iter().skip(1).zip(ids) {
        let Some(leaf) = active else {
            return Err(BuildError::NoPanes);
        };
        let new_leaf = split_leaf(
            &mut tree,
            leaf,
            pane_id,
            step.axis,
            step.percent,
            BUILD_MIN_SIZE,
        )?;
        active = Some(new_leaf);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("p{i}")).collect()
    }

    #[test]
    fn grid_parse_accepts_common_forms() {
        assert_eq!(GridSpec::parse("2x3").unwrap(), GridSpec::new(2, 3));
        assert_eq!(GridSpec::parse(" 1 X 4 ").unwrap(), GridSpec::new(1, 4));
        assert_eq!("3x1".parse::<GridSpec>().unwrap().to_string(), "3x1");
    }

    #[test]
    fn grid_parse_rejects_malformed() {
        for raw in ["", "3", "ax2", "2x", "0x2", "2x0", "-1x2", "5000x1"] {
            assert!(
                matches!(GridSpec::parse(raw), Err(BuildError::InvalidGrid { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn build_rejects_out_of_range_grid() {
        for grid in [GridSpec::new(1, 5000), GridSpec::new(0, 2), GridSpec::new(3, 0)] {
            let err = build_tree(&LayoutSpec::Grid(grid), &ids(6)).unwrap_err();
            assert!(
                matches!(err, BuildError::InvalidGrid { .. }),
                "{grid} should be rejected, got {err:?}"
            );
        }
        assert!(build_tree(&LayoutSpec::Grid(GridSpec::new(1, 1000)), &ids(1000)).is_ok());
    }

    #[test]
    fn one_by_two_grid() {
        let tree = build_tree(&LayoutSpec::Grid(GridSpec::new(1, 2)), &["p1", "p2"]).unwrap();
        let rects = tree.rects();
        assert_eq!(rects["p1"], Rect::new(0, 0, 500, 1000));
        assert_eq!(rects["p2"], Rect::new(500, 0, 500, 1000));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn single_cell_grid_is_a_leaf() {
        let tree = build_tree(&LayoutSpec::Grid(GridSpec::new(1, 1)), &["only"]).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).unwrap().pane_id(), Some("only"));
    }

    #[test]
    fn column_grid_is_single_vertical_split() {
        let tree = build_tree(&LayoutSpec::Grid(GridSpec::new(3, 1)), &ids(3)).unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.axis(), Some(Axis::Vertical));
        assert_eq!(root.children().len(), 3);
        let rects = tree.rects();
        assert_eq!(rects["p1"].height, 333);
        assert_eq!(rects["p3"], Rect::new(0, 666, 1000, 334));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn grid_assigns_row_major() {
        let tree = build_tree(&LayoutSpec::Grid(GridSpec::new(2, 3)), &ids(6)).unwrap();
        let rects = tree.rects();
        assert_eq!(rects["p1"], Rect::new(0, 0, 333, 500));
        assert_eq!(rects["p3"], Rect::new(666, 0, 334, 500));
        assert_eq!(rects["p4"], Rect::new(0, 500, 333, 500));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn grid_needs_enough_ids() {
        let err = build_tree(&LayoutSpec::Grid(GridSpec::new(2, 2)), &ids(3)).unwrap_err();
        assert_eq!(err, BuildError::NotEnoughPaneIds { needed: 4, got: 3 });
        assert_eq!(err.to_string(), "layout: need 4 pane ids, got 3");
    }

    #[test]
    fn duplicate_and_empty_ids_are_rejected() {
        let grid = LayoutSpec::Grid(GridSpec::new(1, 2));
        assert!(matches!(
            build_tree(&grid, &["a", "a"]),
            Err(BuildError::DuplicatePaneId { .. })
        ));
        assert_eq!(
            build_tree(&grid, &["a", " "]).unwrap_err(),
            BuildError::EmptyPaneId { index: 1 }
        );
    }

    #[test]
    fn split_sequence_splits_newest_pane() {
        let spec = LayoutSpec::Splits(vec![
            SplitDirective::new(Axis::Horizontal, 0),
            SplitDirective::new(Axis::Vertical, 30),
            SplitDirective::new(Axis::Horizontal, 50),
        ]);
        let tree = build_tree(&spec, &ids(3)).unwrap();
        let rects = tree.rects();
        assert_eq!(rects["p1"], Rect::new(0, 0, 1000, 700));
        assert_eq!(rects["p2"], Rect::new(0, 700, 500, 300));
        assert_eq!(rects["p3"], Rect::new(500, 700, 500, 300));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn config_prefers_grid_over_panes() {
        let config = LayoutConfig {
            grid: Some("1x2".into()),
            panes: vec![PaneDef::default()],
        };
        assert_eq!(
            LayoutSpec::from_config(&config).unwrap(),
            LayoutSpec::Grid(GridSpec::new(1, 2))
        );

        let config = LayoutConfig {
            grid: Some("  ".into()),
            panes: vec![
                PaneDef::default(),
                PaneDef {
                    split: "V".into(),
                    size: " 30% ".into(),
                },
            ],
        };
        assert_eq!(
            LayoutSpec::from_config(&config).unwrap(),
            LayoutSpec::Splits(vec![
                SplitDirective::new(Axis::Horizontal, 0),
                SplitDirective::new(Axis::Vertical, 30),
            ])
        );
    }

    #[test]
    fn config_without_panes_fails() {
        assert_eq!(
            LayoutSpec::from_config(&LayoutConfig::default()),
            Err(BuildError::NoPanes)
        );
        assert_eq!(
            build_tree::<&str>(&LayoutSpec::Splits(Vec::new()), &[]),
            Err(BuildError::NoPanes)
        );
    }

    #[test]
    fn percent_parsing() {
        assert_eq!(parse_percent("30%"), 30);
        assert_eq!(parse_percent("75"), 75);
        assert_eq!(parse_percent(""), 0);
        assert_eq!(parse_percent("abc"), 0);
        assert_eq!(parse_percent("120%"), 0);
        assert_eq!(parse_percent("-5"), 0);
    }

    #[test]
    fn layout_config_reads_from_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [[panes]]
            [[panes]]
            split = "vertical"
            size = "40%"
            "#,
        )
        .unwrap();
        assert_eq!(config.panes.len(), 2);
        assert_eq!(config.grid, None);
        let tree = build_tree(&LayoutSpec::from_config(&config).unwrap(), &["a", "b"]).unwrap();
        assert_eq!(tree.rects()["b"].height, 400);
    }
}
