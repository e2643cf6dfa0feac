//! Tunable search parameters, exposed as UCI spin options. Values ship as
//! fixed defaults; there is no tuning loop in the engine itself.

use crate::board::{MAX_MOVES, MAX_PLY};

use super::constants::{Score, MAX_DEPTH};

/// Extended futility margins, indexed by remaining depth.
pub const EFP_MAX_DEPTH: usize = 2;
/// Reverse futility margins, indexed by remaining depth.
pub const RFP_MAX_DEPTH: usize = 3;

#[derive(Clone, Debug)]
pub struct SearchParams {
    pub extended_futility_margins: [Score; EFP_MAX_DEPTH + 1],
    pub reverse_futility_margins: [Score; RFP_MAX_DEPTH + 1],
    pub null_move_depth_reduction: u8,
    pub probcut_depth_reduction: u8,
    pub probcut_min_depth: u8,
    pub probcut_margin: Score,
    /// LMR scales as 1000x fixed-point of the log-product coefficient.
    pub reductions_quiet_scale: i16,
    pub reductions_capture_scale: i16,
    pub history_max_depth: u8,
    pub history_prune_threshold: i32,
    pub see_prune_threshold: i32,
    pub contempt: Score,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            extended_futility_margins: [0, 200, 700],
            reverse_futility_margins: [0, 200, 400, 800],
            null_move_depth_reduction: 2,
            probcut_depth_reduction: 3,
            probcut_min_depth: 6,
            probcut_margin: 300,
            reductions_quiet_scale: 400,
            reductions_capture_scale: 250,
            history_max_depth: 3,
            history_prune_threshold: 15,
            see_prune_threshold: 50,
            contempt: 10,
        }
    }
}

/// Late-move reduction lookup: `[quiet/capture][depth][move count]`.
pub type ReductionsTable = Box<[[[u8; MAX_MOVES]; MAX_DEPTH]; 2]>;

impl SearchParams {
    /// Precompute `floor(ln(depth) * ln(count) * scale)` for both move
    /// classes. Rebuilt whenever a reduction scale option changes.
    #[must_use]
    pub fn build_reductions(&self) -> ReductionsTable {
        let mut table: ReductionsTable = vec![[[0u8; MAX_MOVES]; MAX_DEPTH]; 2]
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        let quiet_scale = f64::from(self.reductions_quiet_scale) / 1000.0;
        let capture_scale = f64::from(self.reductions_capture_scale) / 1000.0;
        for depth in 1..MAX_DEPTH {
            for count in 1..MAX_MOVES {
                let log_product = (depth as f64).ln() * (count as f64).ln();
                table[0][depth][count] = (log_product * quiet_scale + 1.0).floor().max(0.0) as u8;
                table[1][depth][count] = (log_product * capture_scale).floor().max(0.0) as u8;
            }
        }
        table
    }
}

// Keep the killer table and the snapshot stack in step with the deepest
// search the driver can request.
const _: () = assert!(MAX_DEPTH < MAX_PLY);
