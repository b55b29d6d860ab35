//! Engine error type and its failure categories.

use thiserror::Error;

use crate::engine::ResizeEdge;
use crate::tree::TreeError;

/// Coarse classification of an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The operation names a pane that does not exist.
    InvalidReference,
    /// The operation would create a pane ID that already exists.
    Conflict,
    /// Minimum-size constraints cannot be met.
    Geometry,
    /// The tree shape does not allow the operation, or is corrupt.
    Structure,
    /// Missing tree or malformed operation input.
    Precondition,
}

/// Failure of a single [`Engine::apply`](crate::Engine::apply) call.
///
/// The live tree is never modified when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout: engine has no tree attached")]
    NoTree,
    #[error("layout: {field} must not be empty")]
    MissingPaneId { field: &'static str },
    #[error("layout: unknown pane {pane_id:?}")]
    UnknownPane { pane_id: String },
    #[error("layout: pane {pane_id:?} already exists")]
    PaneExists { pane_id: String },
    #[error("layout: pane {pane_id:?} has no neighbor across its {edge} edge")]
    NoResizableSplit { pane_id: String, edge: ResizeEdge },
    #[error("layout: split too small to resize ({total} units, need {required})")]
    ResizeInfeasible { total: u32, required: u32 },
    #[error("layout: pane {pane_id:?} spans {span} units, too small to split with minimum {min}")]
    SplitInfeasible { pane_id: String, span: u32, min: u32 },
    #[error("layout: {children} panes need {required} units but only {span} are available")]
    ResetInfeasible {
        span: u32,
        children: usize,
        required: u32,
    },
    #[error("layout: sibling of pane {pane_id:?} not found")]
    MissingSibling { pane_id: String },
    #[error("layout: tree invariant violated: {0}")]
    Corrupted(#[from] TreeError),
}

impl LayoutError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoTree | Self::MissingPaneId { .. } => ErrorCategory::Precondition,
            Self::UnknownPane { .. } => ErrorCategory::InvalidReference,
            Self::PaneExists { .. } => ErrorCategory::Conflict,
            Self::ResizeInfeasible { .. }
            | Self::SplitInfeasible { .. }
            | Self::ResetInfeasible { .. } => ErrorCategory::Geometry,
            Self::NoResizableSplit { .. } | Self::MissingSibling { .. } | Self::Corrupted(_) => {
                ErrorCategory::Structure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_each_failure_class() {
        assert_eq!(LayoutError::NoTree.category(), ErrorCategory::Precondition);
        assert_eq!(
            LayoutError::UnknownPane {
                pane_id: "p9".into()
            }
            .category(),
            ErrorCategory::InvalidReference
        );
        assert_eq!(
            LayoutError::PaneExists {
                pane_id: "p1".into()
            }
            .category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            LayoutError::ResizeInfeasible {
                total: 60,
                required: 100
            }
            .category(),
            ErrorCategory::Geometry
        );
        assert_eq!(
            LayoutError::NoResizableSplit {
                pane_id: "p1".into(),
                edge: ResizeEdge::Left
            }
            .category(),
            ErrorCategory::Structure
        );
    }

    #[test]
    fn messages_name_the_pane() {
        let err = LayoutError::NoResizableSplit {
            pane_id: "p1".into(),
            edge: ResizeEdge::Up,
        };
        assert_eq!(
            err.to_string(),
            "layout: pane \"p1\" has no neighbor across its up edge"
        );
    }
}
