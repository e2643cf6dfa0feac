//! Incrementally-updated neural evaluation.
//!
//! The first layer is fixed-point and updated move-by-move through the
//! [`Accumulator`]; the small dense layers behind it are floating point and
//! recomputed per evaluation. Weights are process-wide, constructed once at
//! startup and shared by every position.

pub mod accumulator;
pub mod features;
pub mod fixed;
pub mod linalg;
mod network;
mod weights;

pub use accumulator::Accumulator;
pub use fixed::AccFixed;
pub use weights::{weights, NnueWeights};

/// Width of each per-colour accumulator half.
pub const N_ACCUMULATED: usize = 128;

/// First-layer input width: own-side features then opponent features.
pub const N_INPUTS: usize = 2 * features::N_FEATURES;

/// Block size of the first layer's block-transposed storage.
pub const WEIGHT_BLOCK: usize = 4;

/// Hidden layer width.
pub const N_HIDDEN: usize = 64;
