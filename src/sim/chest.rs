//! Chest drift and path-overlap detection
//!
//! The chest is pulled by the sum of the two tokens' absolute positions every
//! round. What matters for the match is the integer path it sweeps, not where
//! it lands.

use serde::{Deserialize, Serialize};

/// Result of moving the chest for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Chest position before the drift
    pub from: i32,
    /// Chest position after the drift
    pub to: i32,
    /// Token A lies on the swept path
    pub reached_a: bool,
    /// Token B lies on the swept path
    pub reached_b: bool,
}

impl DriftReport {
    /// Either token was reached
    #[inline]
    pub fn overlap(&self) -> bool {
        self.reached_a || self.reached_b
    }

    /// Swept path as an inclusive `(lo, hi)` range
    #[inline]
    pub fn span(&self) -> (i32, i32) {
        (self.from.min(self.to), self.from.max(self.to))
    }
}

/// New chest position: previous position plus both new token positions.
///
/// Saturates at the `i32` range instead of wrapping.
#[inline]
pub fn drift_target(chest: i32, new_a: i32, new_b: i32) -> i32 {
    let target = chest as i64 + new_a as i64 + new_b as i64;
    target.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Whether `pos` lies on the closed path between `from` and `to`
#[inline]
pub fn path_contains(from: i32, to: i32, pos: i32) -> bool {
    (from.min(to)..=from.max(to)).contains(&pos)
}

/// Drift the chest and check both tokens against the swept path
pub fn drift_chest(chest: i32, new_a: i32, new_b: i32) -> DriftReport {
    let to = drift_target(chest, new_a, new_b);
    let report = DriftReport {
        from: chest,
        to,
        reached_a: path_contains(chest, to, new_a),
        reached_b: path_contains(chest, to, new_b),
    };

    log::debug!(
        "chest drift: {} + ({} + {}) = {}, reached A={} B={}",
        chest,
        new_a,
        new_b,
        to,
        report.reached_a,
        report.reached_b
    );

    report
}
