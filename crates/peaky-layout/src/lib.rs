#![forbid(unsafe_code)]

//! Pane layout engine for terminal workspaces.
//!
//! A workspace is a tree of panes inside a fixed 1000 × 1000 logical space.
//! Split nodes divide their span among children by integer weights; leaves
//! hold one pane each. The [`Engine`] is the single mutation entry point:
//! it applies [`Op`]s (resize, split, close, reset, swap, zoom) atomically,
//! enforces minimum pane sizes, snaps dragged boundaries to useful positions,
//! and keeps an undo/redo [`History`].
//!
//! # Example
//!
//! ```
//! use peaky_layout::{build_tree, Engine, GridSpec, LayoutSpec, Op, ResizeEdge};
//!
//! let tree = build_tree(&LayoutSpec::Grid(GridSpec::new(1, 2)), &["p1", "p2"]).unwrap();
//! let mut engine = Engine::new(tree);
//!
//! engine.apply(Op::resize("p1", ResizeEdge::Right, 100)).unwrap();
//! assert_eq!(engine.rects()["p1"].width, 600);
//!
//! engine.apply(Op::reset_all()).unwrap();
//! assert_eq!(engine.rects()["p2"].width, 500);
//! assert!(engine.history().is_empty());
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod projection;
pub mod snap;
pub mod snapshot;
pub mod tree;

pub use builder::{BuildError, GridSpec, LayoutConfig, LayoutSpec, PaneDef, SplitDirective, build_tree};
pub use config::{ConfigError, Constraints, EngineConfig};
pub use engine::{ApplyResult, Engine, Op, OpKind, ResizeEdge};
pub use error::{ErrorCategory, LayoutError};
pub use geometry::{Axis, LAYOUT_BASE_SIZE, Rect, normalize_sizes, split_evenly};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use projection::{
    CellRect, SharedEdge, hit_edge, layout_pos_from_screen, scale_pos, scale_rect, scale_rects,
    shared_edges,
};
pub use snap::{SnapConfig, SnapOutcome, SnapState, snap_position, snap_position_with_targets};
pub use snapshot::{NodeSnapshot, SnapshotError, TREE_SNAPSHOT_SCHEMA_VERSION, TreeSnapshot};
pub use tree::{NodeId, NodeKind, NodeRecord, Tree, TreeError};
