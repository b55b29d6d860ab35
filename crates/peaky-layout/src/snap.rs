//! Snap heuristic for dragged split boundaries.
//!
//! A drag produces a stream of desired boundary positions. Each one is
//! clamped into `[min, max]` and then compared against candidate targets in
//! priority order:
//!
//! 1. the midpoint of the range,
//! 2. configured ratio lines,
//! 3. the nearest grid-step multiples,
//! 4. caller-supplied extra targets (neighbor pane edges).
//!
//! The first tier with a candidate inside [`SnapConfig::threshold`] wins.
//! Once a target is active it stays locked while the pointer remains within
//! `threshold + hysteresis` of it, so a boundary hovering between two targets
//! does not flicker.
//!
//! ```text
//!            threshold      hysteresis
//!          |<-------->|<------>|
//!   ───────●──────────┼────────┼──────▶ desired
//!        target     acquire  release
//! ```

use serde::{Deserialize, Serialize};

/// Snap tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Maximum distance at which a candidate attracts the boundary.
    pub threshold: u32,
    /// Extra distance an active target keeps holding the boundary.
    pub hysteresis: u32,
    /// Grid spacing in logical units; `0` disables grid targets.
    pub grid_step: u32,
    /// Ratio break points as percentages of the available span.
    pub ratios: Vec<u32>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            threshold: 12,
            hysteresis: 6,
            grid_step: 50,
            ratios: vec![50, 33, 67, 25, 75],
        }
    }
}

impl SnapConfig {
    /// Configuration that never snaps to anything but extra targets within
    /// `threshold`, useful for neighbor-edge alignment only.
    #[must_use]
    pub fn edges_only(threshold: u32, hysteresis: u32) -> Self {
        Self {
            threshold,
            hysteresis,
            grid_step: 0,
            ratios: Vec::new(),
        }
    }
}

/// Snap lock carried across consecutive resize calls of one drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapState {
    /// Locked position, relative to the start of the resized pair.
    pub target: Option<u32>,
}

impl SnapState {
    #[must_use]
    pub const fn locked(target: u32) -> Self {
        Self {
            target: Some(target),
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        self.target.is_some()
    }
}

/// Result of one snap decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapOutcome {
    pub position: u32,
    pub snapped: bool,
    pub state: SnapState,
}

impl SnapOutcome {
    fn free(position: u32) -> Self {
        Self {
            position,
            snapped: false,
            state: SnapState::default(),
        }
    }

    fn locked(position: u32) -> Self {
        Self {
            position,
            snapped: true,
            state: SnapState::locked(position),
        }
    }
}

/// Resolve `desired` against the built-in targets only.
#[must_use]
pub fn snap_position(
    config: &SnapConfig,
    desired: i64,
    min: u32,
    max: u32,
    state: SnapState,
) -> SnapOutcome {
    snap_position_with_targets(config, desired, min, max, state, &[])
}

/// Resolve `desired` into a boundary position within `[min, max]`.
///
/// `extra` holds additional candidates such as neighboring pane edges; values
/// outside the range are ignored. When `min > max` the range is collapsed to
/// `min`.
#[must_use]
pub fn snap_position_with_targets(
    config: &SnapConfig,
    desired: i64,
    min: u32,
    max: u32,
    state: SnapState,
    extra: &[u32],
) -> SnapOutcome {
    let max = max.max(min);
    let clamped = clamp_to(desired, min, max);

    if let Some(target) = state.target
        && (min..=max).contains(&target)
        && clamped.abs_diff(target) <= config.threshold.saturating_add(config.hysteresis)
    {
        return SnapOutcome::locked(target);
    }

    let in_range = |pos: &u32| (min..=max).contains(pos);

    let midpoint = [min + (max - min) / 2];
    if let Some(pos) = closest_within(clamped, config.threshold, midpoint.iter().copied()) {
        return SnapOutcome::locked(pos);
    }

    let span = u64::from(min) + u64::from(max);
    let ratio_lines = config
        .ratios
        .iter()
        .filter(|&&pct| pct > 0 && pct < 100)
        .map(|&pct| (span * u64::from(pct) / 100) as u32)
        .filter(in_range);
    if let Some(pos) = closest_within(clamped, config.threshold, ratio_lines) {
        return SnapOutcome::locked(pos);
    }

    if config.grid_step > 0 {
        let below = clamped / config.grid_step * config.grid_step;
        let above = below.saturating_add(config.grid_step);
        let grid_lines = [below, above].into_iter().filter(in_range);
        if let Some(pos) = closest_within(clamped, config.threshold, grid_lines) {
            return SnapOutcome::locked(pos);
        }
    }

    let neighbors = extra.iter().copied().filter(in_range);
    if let Some(pos) = closest_within(clamped, config.threshold, neighbors) {
        return SnapOutcome::locked(pos);
    }

    SnapOutcome::free(clamped)
}

fn clamp_to(desired: i64, min: u32, max: u32) -> u32 {
    desired.clamp(i64::from(min), i64::from(max)) as u32
}

/// Closest candidate within `threshold` of `pos`; ties go to the lower value.
fn closest_within(pos: u32, threshold: u32, candidates: impl Iterator<Item = u32>) -> Option<u32> {
    candidates
        .map(|candidate| (candidate.abs_diff(pos), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min()
        .map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_midpoint_then_holds_with_hysteresis() {
        let cfg = SnapConfig::default();
        let first = snap_position(&cfg, 495, 100, 900, SnapState::default());
        assert!(first.snapped);
        assert_eq!(first.position, 500);

        let held = snap_position(&cfg, 506, 100, 900, first.state);
        assert!(held.snapped);
        assert_eq!(held.position, 500);
        assert_eq!(held.state, SnapState::locked(500));
    }

    #[test]
    fn releases_outside_hysteresis_band() {
        let cfg = SnapConfig {
            grid_step: 0,
            ratios: Vec::new(),
            ..SnapConfig::default()
        };
        let out = snap_position(&cfg, 519, 100, 900, SnapState::locked(500));
        assert!(!out.snapped);
        assert_eq!(out.position, 519);
        assert_eq!(out.state, SnapState::default());
    }

    #[test]
    fn without_lock_only_threshold_applies() {
        let cfg = SnapConfig {
            grid_step: 0,
            ratios: Vec::new(),
            ..SnapConfig::default()
        };
        let out = snap_position(&cfg, 515, 100, 900, SnapState::default());
        assert!(!out.snapped);
        assert_eq!(out.position, 515);
    }

    #[test]
    fn ratio_tier_beats_grid_tier() {
        let cfg = SnapConfig {
            threshold: 10,
            hysteresis: 0,
            grid_step: 100,
            ratios: vec![33],
        };
        // Range [0, 1000]: midpoint 500, ratio 330, grid 300/400.
        let out = snap_position(&cfg, 322, 0, 1000, SnapState::default());
        assert_eq!(out.position, 330);

        let out = snap_position(&cfg, 305, 0, 1000, SnapState::default());
        assert_eq!(out.position, 300);
    }

    #[test]
    fn extra_targets_are_last_resort() {
        let cfg = SnapConfig::edges_only(10, 3);
        let out = snap_position_with_targets(&cfg, 240, 50, 950, SnapState::default(), &[247, 900]);
        assert!(out.snapped);
        assert_eq!(out.position, 247);

        let out = snap_position_with_targets(&cfg, 240, 50, 950, SnapState::default(), &[20]);
        assert!(!out.snapped);
    }

    #[test]
    fn desired_is_clamped_first() {
        let cfg = SnapConfig::edges_only(0, 0);
        assert_eq!(
            snap_position(&cfg, -40, 50, 950, SnapState::default()).position,
            50
        );
        assert_eq!(
            snap_position(&cfg, 5_000, 50, 950, SnapState::default()).position,
            950
        );
    }

    #[test]
    fn stale_lock_outside_range_is_ignored() {
        let cfg = SnapConfig::edges_only(10, 10);
        let out = snap_position(&cfg, 60, 50, 100, SnapState::locked(400));
        assert!(!out.snapped);
        assert_eq!(out.position, 60);
    }

    #[test]
    fn equidistant_candidates_prefer_lower() {
        let cfg = SnapConfig::edges_only(10, 0);
        let out = snap_position_with_targets(&cfg, 200, 0, 1000, SnapState::default(), &[205, 195]);
        assert_eq!(out.position, 195);
    }
}
