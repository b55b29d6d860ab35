//! Logical coordinate space shared by every pane tree.
//!
//! Geometry is fixed-point: the root always spans [`LAYOUT_BASE_SIZE`] units
//! on both axes and every split partitions its parent's span with integer
//! arithmetic. Rounding remainders are handed to the last child, so child
//! spans always sum exactly to the parent span.
//!
//! ```text
//!   weights [1, 1, 1] over a span of 1000
//!   ┌─────────┬─────────┬──────────┐
//!   │   333   │   333   │   334    │
//!   └─────────┴─────────┴──────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Width and height of the root rectangle in logical units.
pub const LAYOUT_BASE_SIZE: u32 = 1000;

/// Direction in which a split node arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Children are laid out left to right.
    Horizontal,
    /// Children are laid out top to bottom.
    Vertical,
}

impl Axis {
    /// Parse a directive word. `"vertical"` and `"v"` select [`Axis::Vertical`];
    /// anything else is horizontal.
    #[must_use]
    pub fn from_directive(raw: &str) -> Self {
        let word = raw.trim();
        if word.eq_ignore_ascii_case("vertical") || word.eq_ignore_ascii_case("v") {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Axis-aligned rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full logical space occupied by a tree's root.
    #[must_use]
    pub const fn root() -> Self {
        Self::new(0, 0, LAYOUT_BASE_SIZE, LAYOUT_BASE_SIZE)
    }

    #[must_use]
    pub const fn right(self) -> u32 {
        self.x + self.width
    }

    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y + self.height
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Extent along `axis`.
    #[must_use]
    pub const fn span(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Leading coordinate along `axis`.
    #[must_use]
    pub const fn start(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Partition this rectangle along `axis` according to `weights`.
    ///
    /// The returned rectangles tile `self` exactly, in order.
    #[must_use]
    pub fn partition(self, axis: Axis, weights: &[u32]) -> Vec<Self> {
        let spans = normalize_sizes(weights, self.span(axis));
        let mut offset = self.start(axis);
        spans
            .into_iter()
            .map(|span| {
                let rect = match axis {
                    Axis::Horizontal => Self::new(offset, self.y, span, self.height),
                    Axis::Vertical => Self::new(self.x, offset, self.width, span),
                };
                offset += span;
                rect
            })
            .collect()
    }
}

/// Resolve relative weights into absolute spans that sum exactly to `total`.
///
/// An all-zero weight list divides the span evenly. Otherwise each entry gets
/// `weight * total / sum`; truncation leftovers go to the last entry.
#[must_use]
pub fn normalize_sizes(weights: &[u32], total: u32) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if sum == 0 {
        return split_evenly(total, weights.len());
    }
    let mut spans: Vec<u32> = weights
        .iter()
        .map(|&w| {
            // weight <= sum, so the quotient never exceeds total.
            (u64::from(w) * u64::from(total) / sum) as u32
        })
        .collect();
    let used: u32 = spans.iter().sum();
    if let Some(last) = spans.last_mut() {
        *last += total - used;
    }
    spans
}

/// Divide `total` into `parts` equal shares, remainder to the last share.
#[must_use]
pub fn split_evenly(total: u32, parts: usize) -> Vec<u32> {
    if parts == 0 {
        return Vec::new();
    }
    let count = u32::try_from(parts).unwrap_or(u32::MAX);
    let share = total / count;
    let mut spans = vec![share; parts];
    if let Some(last) = spans.last_mut() {
        *last += total - share * count;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_weights_split_evenly() {
        assert_eq!(normalize_sizes(&[0, 0, 0], 1000), vec![333, 333, 334]);
    }

    #[test]
    fn weights_resolve_proportionally() {
        assert_eq!(normalize_sizes(&[600, 400], 1000), vec![600, 400]);
        assert_eq!(normalize_sizes(&[1, 1, 1], 100), vec![33, 33, 34]);
        assert_eq!(normalize_sizes(&[500, 500], 333), vec![166, 167]);
    }

    #[test]
    fn empty_weights_yield_nothing() {
        assert!(normalize_sizes(&[], 1000).is_empty());
        assert!(split_evenly(1000, 0).is_empty());
    }

    #[test]
    fn axis_directive_parsing() {
        assert_eq!(Axis::from_directive("vertical"), Axis::Vertical);
        assert_eq!(Axis::from_directive(" V "), Axis::Vertical);
        assert_eq!(Axis::from_directive("horizontal"), Axis::Horizontal);
        assert_eq!(Axis::from_directive(""), Axis::Horizontal);
        assert_eq!(Axis::from_directive("sideways"), Axis::Horizontal);
    }

    #[test]
    fn partition_tiles_parent() {
        let parts = Rect::new(10, 20, 100, 50).partition(Axis::Vertical, &[1, 3]);
        assert_eq!(
            parts,
            vec![Rect::new(10, 20, 100, 12), Rect::new(10, 32, 100, 38)]
        );
    }

    proptest! {
        #[test]
        fn normalized_spans_conserve_total(
            weights in proptest::collection::vec(0u32..5_000, 1..12),
            total in 0u32..20_000,
        ) {
            let spans = normalize_sizes(&weights, total);
            prop_assert_eq!(spans.len(), weights.len());
            prop_assert_eq!(spans.iter().map(|&s| u64::from(s)).sum::<u64>(), u64::from(total));
        }

        #[test]
        fn partition_is_contiguous(
            weights in proptest::collection::vec(0u32..1_000, 1..8),
            width in 1u32..2_000,
            height in 1u32..2_000,
            horizontal in any::<bool>(),
        ) {
            let axis = if horizontal { Axis::Horizontal } else { Axis::Vertical };
            let parent = Rect::new(7, 3, width, height);
            let parts = parent.partition(axis, &weights);
            let mut cursor = parent.start(axis);
            for part in &parts {
                prop_assert_eq!(part.start(axis), cursor);
                cursor += part.span(axis);
            }
            prop_assert_eq!(cursor, parent.start(axis) + parent.span(axis));
        }
    }
}
