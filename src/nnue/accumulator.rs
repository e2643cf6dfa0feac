//! The first-layer accumulator: one 128-wide fixed-point vector per viewer
//! colour, initialised from a position and updated bit-exactly as moves are
//! made and unmade. No floating point touches this path; `make` followed by
//! `unmake` restores the exact bit pattern.

use crate::board::{Board, Color, Move, COLORS};

use super::features::{self, FeatureDiff, N_FEATURES};
use super::fixed::AccFixed;
use super::linalg::Dense;
use super::weights::{weights, NnueWeights};
use super::N_ACCUMULATED;

#[derive(Clone)]
pub struct Accumulator {
    values: [Dense<AccFixed, N_ACCUMULATED>; 2],
    weights: &'static NnueWeights,
}

impl PartialEq for Accumulator {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator").finish_non_exhaustive()
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator {
            values: [Dense::zeros(), Dense::zeros()],
            weights: weights(),
        }
    }
}

impl Accumulator {
    /// Rebuild both halves from scratch: `bias + W . encode(board)[viewer]`,
    /// with the viewer's own features in rows 0..384 and the opponent's in
    /// rows 384..768.
    pub fn initialise(&mut self, board: &Board) {
        let encoded = features::encode(board);
        for viewer in COLORS {
            let mut v = self.weights.first_bias;
            for (feature, &x) in encoded[viewer.index()].iter().enumerate() {
                if x != 0 {
                    for j in 0..N_ACCUMULATED {
                        v[j] += self.weights.first.at(feature, j);
                    }
                }
            }
            for (feature, &x) in encoded[(!viewer).index()].iter().enumerate() {
                if x != 0 {
                    for j in 0..N_ACCUMULATED {
                        v[j] += self.weights.first.at(N_FEATURES + feature, j);
                    }
                }
            }
            self.values[viewer.index()] = v;
        }
    }

    /// Apply the feature diffs of `m` played by `mover`.
    pub fn make(&mut self, m: Move, mover: Color) {
        let diffs = features::diff(m, mover, true);
        self.apply(&diffs);
    }

    /// Revert the feature diffs of `m` played by `mover`.
    pub fn unmake(&mut self, m: Move, mover: Color) {
        let diffs = features::diff(m, mover, false);
        self.apply(&diffs);
    }

    fn apply(&mut self, diffs: &[FeatureDiff; 2]) {
        for viewer in COLORS {
            let own = &diffs[viewer.index()];
            let other = &diffs[(!viewer).index()];
            let v = &mut self.values[viewer.index()];
            for &(feature, value) in own.iter() {
                for j in 0..N_ACCUMULATED {
                    v[j] += self.weights.first.at(feature, j).small_mul(i32::from(value));
                }
            }
            for &(feature, value) in other.iter() {
                for j in 0..N_ACCUMULATED {
                    v[j] += self
                        .weights
                        .first
                        .at(N_FEATURES + feature, j)
                        .small_mul(i32::from(value));
                }
            }
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self, viewer: Color) -> &Dense<AccFixed, N_ACCUMULATED> {
        &self.values[viewer.index()]
    }

    #[must_use]
    pub fn weights(&self) -> &'static NnueWeights {
        self.weights
    }
}
