//! Mapping between the logical layout space and terminal cells.
//!
//! Hosts render panes into a viewport measured in cells. These helpers scale
//! logical rectangles into that viewport, map a pointer cell back into logical
//! units, and enumerate the boundaries two panes share so that a drag on a
//! divider can be turned into a [`Op::Resize`](crate::Op::Resize).

use std::collections::BTreeMap;

use crate::engine::{Op, ResizeEdge};
use crate::geometry::{Axis, LAYOUT_BASE_SIZE, Rect};

/// Rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[must_use]
    pub const fn right(self) -> u32 {
        self.x as u32 + self.width as u32
    }

    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y as u32 + self.height as u32
    }
}

/// Scale one logical coordinate into a cell coordinate of a span starting at
/// `base`.
#[must_use]
pub fn scale_pos(base: u16, span: u16, pos: u32) -> u32 {
    let base = u32::from(base);
    if span == 0 || pos == 0 {
        return base;
    }
    if pos >= LAYOUT_BASE_SIZE {
        return base + u32::from(span);
    }
    base + pos * u32::from(span) / LAYOUT_BASE_SIZE
}

/// Scale a logical rectangle into `viewport`.
///
/// Non-empty input always yields at least one cell, clipped to the viewport;
/// `None` when nothing remains.
#[must_use]
pub fn scale_rect(viewport: CellRect, rect: Rect) -> Option<CellRect> {
    if viewport.is_empty() || rect.is_empty() {
        return None;
    }
    let x1 = scale_pos(viewport.x, viewport.width, rect.x);
    let y1 = scale_pos(viewport.y, viewport.height, rect.y);
    let x2 = scale_pos(viewport.x, viewport.width, rect.right());
    let y2 = scale_pos(viewport.y, viewport.height, rect.bottom());

    let width = (x2 - x1).max(1).min(viewport.right().saturating_sub(x1));
    let height = (y2 - y1).max(1).min(viewport.bottom().saturating_sub(y1));
    if width == 0 || height == 0 {
        return None;
    }
    Some(CellRect {
        x: u16::try_from(x1).ok()?,
        y: u16::try_from(y1).ok()?,
        width: u16::try_from(width).ok()?,
        height: u16::try_from(height).ok()?,
    })
}

/// Scale every pane rectangle into `viewport`, dropping panes that vanish.
#[must_use]
pub fn scale_rects(viewport: CellRect, rects: &BTreeMap<String, Rect>) -> BTreeMap<String, CellRect> {
    rects
        .iter()
        .filter_map(|(pane_id, rect)| Some((pane_id.clone(), scale_rect(viewport, *rect)?)))
        .collect()
}

/// Logical position of a pointer cell, clamped into the viewport and rounded
/// to the nearest unit. `None` for an empty viewport.
#[must_use]
pub fn layout_pos_from_screen(viewport: CellRect, x: u16, y: u16) -> Option<(u32, u32)> {
    if viewport.is_empty() {
        return None;
    }
    let to_layout = |pos: u16, base: u16, span: u16| {
        let rel = u32::from(pos.clamp(base, base.saturating_add(span - 1)) - base);
        let span = u32::from(span);
        ((rel * LAYOUT_BASE_SIZE + span / 2) / span).min(LAYOUT_BASE_SIZE)
    };
    Some((
        to_layout(x, viewport.x, viewport.width),
        to_layout(y, viewport.y, viewport.height),
    ))
}

/// A boundary two panes share.
///
/// `pane_id` names the pane on the leading side (left or top); dragging its
/// `edge` moves the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedEdge {
    pub pane_id: String,
    pub edge: ResizeEdge,
    /// Axis the boundary moves along.
    pub axis: Axis,
    /// Logical coordinate of the boundary line.
    pub position: u32,
    /// Extent of the shared segment, perpendicular to `axis`.
    pub range_start: u32,
    pub range_end: u32,
}

impl SharedEdge {
    /// Resize request moving this boundary by `delta` logical units.
    #[must_use]
    pub fn resize_op(&self, delta: i32) -> Op {
        Op::resize(self.pane_id.clone(), self.edge, delta)
    }
}

fn overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> Option<(u32, u32)> {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    (end > start).then_some((start, end))
}

/// Every boundary shared by a pair of panes with positive overlap, sorted by
/// position, then range start, then pane ID.
#[must_use]
pub fn shared_edges(rects: &BTreeMap<String, Rect>) -> Vec<SharedEdge> {
    let panes: Vec<(&String, &Rect)> = rects.iter().filter(|(_, r)| !r.is_empty()).collect();
    let mut edges = Vec::new();
    for (i, &(a_id, a)) in panes.iter().enumerate() {
        for &(b_id, b) in &panes[i + 1..] {
            for ((lead_id, lead), (_, trail)) in [((a_id, a), (b_id, b)), ((b_id, b), (a_id, a))] {
                if lead.right() == trail.x
                    && let Some((start, end)) =
                        overlap(lead.y, lead.bottom(), trail.y, trail.bottom())
                {
                    edges.push(SharedEdge {
                        pane_id: lead_id.clone(),
                        edge: ResizeEdge::Right,
                        axis: Axis::Horizontal,
                        position: lead.right(),
                        range_start: start,
                        range_end: end,
                    });
                }
                if lead.bottom() == trail.y
                    && let Some((start, end)) =
                        overlap(lead.x, lead.right(), trail.x, trail.right())
                {
                    edges.push(SharedEdge {
                        pane_id: lead_id.clone(),
                        edge: ResizeEdge::Down,
                        axis: Axis::Vertical,
                        position: lead.bottom(),
                        range_start: start,
                        range_end: end,
                    });
                }
            }
        }
    }
    edges.sort_by(|a, b| {
        (a.position, a.range_start, &a.pane_id, a.edge.as_str())
            .cmp(&(b.position, b.range_start, &b.pane_id, b.edge.as_str()))
    });
    edges
}

/// Edge whose scaled divider line lies within `padding` cells of the pointer.
#[must_use]
pub fn hit_edge<'a>(
    viewport: CellRect,
    edges: &'a [SharedEdge],
    x: u16,
    y: u16,
    padding: u16,
) -> Option<&'a SharedEdge> {
    let (px, py) = (u32::from(x), u32::from(y));
    let padding = u32::from(padding);
    edges
        .iter()
        .filter_map(|edge| {
            let (line, along, range_start, range_end) = match edge.axis {
                Axis::Horizontal => (
                    scale_pos(viewport.x, viewport.width, edge.position),
                    py,
                    scale_pos(viewport.y, viewport.height, edge.range_start),
                    scale_pos(viewport.y, viewport.height, edge.range_end),
                ),
                Axis::Vertical => (
                    scale_pos(viewport.y, viewport.height, edge.position),
                    px,
                    scale_pos(viewport.x, viewport.width, edge.range_start),
                    scale_pos(viewport.x, viewport.width, edge.range_end),
                ),
            };
            let across = match edge.axis {
                Axis::Horizontal => px,
                Axis::Vertical => py,
            };
            let distance = across.abs_diff(line);
            (distance <= padding && along >= range_start && along < range_end)
                .then_some((distance, edge))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, edge)| edge)
}
