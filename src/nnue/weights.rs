//! Network weight storage and loading.
//!
//! The weight tables are program-scoped and immutable: built once behind a
//! `Lazy`, then borrowed by every accumulator. A real trained set is loaded
//! from the path in `MERIDIAN_EVAL_FILE`; without one the engine falls back
//! to deterministic built-in weights that reduce the network to a material
//! counter, which keeps every code path exercised and bit-reproducible.

use std::path::Path;

use log::{info, warn};
use once_cell::sync::Lazy;

use crate::board::PIECES;

use super::fixed::AccFixed;
use super::linalg::{BlockTransposed, Dense, Matrix};
use super::{features::N_FEATURES, N_ACCUMULATED, N_HIDDEN, N_INPUTS, WEIGHT_BLOCK};

/// Centipawn value per piece used by the built-in material weights.
const MATERIAL: [f32; 6] = [100.0, 300.0, 350.0, 500.0, 900.0, 0.0];

/// Scale applied to material before it enters the first layer; chosen so
/// every weight is a dyadic rational and quantises exactly.
const MATERIAL_SCALE: f32 = 1.0 / 1600.0;

pub struct NnueWeights {
    /// First layer, quantised to the accumulator's fixed-point type. Rows
    /// 0..384 are the viewer's own features, rows 384..768 the opponent's.
    pub first: BlockTransposed<AccFixed, N_INPUTS, N_ACCUMULATED, WEIGHT_BLOCK>,
    pub first_bias: Dense<AccFixed, N_ACCUMULATED>,
    /// Hidden layer over the 256-wide accumulator concatenation.
    pub hidden: Matrix<f32, N_HIDDEN, { 2 * N_ACCUMULATED }>,
    pub hidden_bias: Dense<f32, N_HIDDEN>,
    pub output: Dense<f32, N_HIDDEN>,
    pub output_bias: f32,
}

impl NnueWeights {
    /// Quantise a float first layer and wrap the rest.
    #[must_use]
    pub fn from_float(
        first: &Matrix<f32, N_INPUTS, N_ACCUMULATED>,
        first_bias: &Dense<f32, N_ACCUMULATED>,
        hidden: Matrix<f32, N_HIDDEN, { 2 * N_ACCUMULATED }>,
        hidden_bias: Dense<f32, N_HIDDEN>,
        output: Dense<f32, N_HIDDEN>,
        output_bias: f32,
    ) -> Self {
        let mut quantised = BlockTransposed::zeros();
        for i in 0..N_INPUTS {
            for j in 0..N_ACCUMULATED {
                *quantised.at_mut(i, j) = AccFixed::from_f32(first.at(i, j));
            }
        }
        NnueWeights {
            first: quantised,
            first_bias: first_bias.map(AccFixed::from_f32),
            hidden,
            hidden_bias,
            output,
            output_bias,
        }
    }

    /// Built-in weights: the first layer counts each side's material into
    /// two accumulator lanes, the dense layers recombine them into a
    /// centipawn-scaled difference.
    #[must_use]
    pub fn material() -> Self {
        let mut first = Matrix::<f32, N_INPUTS, N_ACCUMULATED>::zeros();
        for piece in PIECES {
            let value = MATERIAL[piece.index()] * MATERIAL_SCALE;
            for sq in 0..64 {
                let feature = piece.index() * 64 + sq;
                // Own material into lane 0, opponent material into lane 1.
                *first.at_mut(feature, 0) = value;
                *first.at_mut(N_FEATURES + feature, 1) = value;
            }
        }

        let mut hidden = Matrix::<f32, N_HIDDEN, { 2 * N_ACCUMULATED }>::zeros();
        let mut hidden_bias = Dense::<f32, N_HIDDEN>::zeros();
        // Hidden lane 0 = (own - opponent) material, offset to stay in the
        // ReLU's linear region for any legal material balance.
        *hidden.at_mut(0, 0) = 1.0;
        *hidden.at_mut(0, 1) = -1.0;
        hidden_bias[0] = 3.0;

        let mut output = Dense::<f32, N_HIDDEN>::zeros();
        output[0] = 4.0;
        let output_bias = -12.0;

        Self::from_float(
            &first,
            &Dense::zeros(),
            hidden,
            hidden_bias,
            output,
            output_bias,
        )
    }

    /// Parse a little-endian f32 blob: first layer (row-major 768 x 128),
    /// first bias, hidden layer (row-major 64 x 256), hidden bias, output
    /// weights, output bias.
    pub fn from_bytes(data: &[u8]) -> Result<Self, WeightsError> {
        const EXPECTED: usize = (N_INPUTS * N_ACCUMULATED
            + N_ACCUMULATED
            + N_HIDDEN * 2 * N_ACCUMULATED
            + N_HIDDEN
            + N_HIDDEN
            + 1)
            * 4;
        if data.len() != EXPECTED {
            return Err(WeightsError::Length {
                expected: EXPECTED,
                got: data.len(),
            });
        }

        let mut floats = data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]));
        let mut next = || floats.next().expect("length checked above");

        let mut first = Matrix::<f32, N_INPUTS, N_ACCUMULATED>::zeros();
        for i in 0..N_INPUTS {
            for j in 0..N_ACCUMULATED {
                *first.at_mut(i, j) = next();
            }
        }
        let first_bias = Dense::from_fn(|_| next());
        let mut hidden = Matrix::<f32, N_HIDDEN, { 2 * N_ACCUMULATED }>::zeros();
        for i in 0..N_HIDDEN {
            for j in 0..2 * N_ACCUMULATED {
                *hidden.at_mut(i, j) = next();
            }
        }
        let hidden_bias = Dense::from_fn(|_| next());
        let output = Dense::from_fn(|_| next());
        let output_bias = next();

        Ok(Self::from_float(
            &first,
            &first_bias,
            hidden,
            hidden_bias,
            output,
            output_bias,
        ))
    }

    pub fn from_file(path: &Path) -> Result<Self, WeightsError> {
        let data = std::fs::read(path).map_err(WeightsError::Io)?;
        Self::from_bytes(&data)
    }
}

#[derive(Debug)]
pub enum WeightsError {
    Length { expected: usize, got: usize },
    Io(std::io::Error),
}

impl std::fmt::Display for WeightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightsError::Length { expected, got } => {
                write!(f, "weight blob is {got} bytes, expected {expected}")
            }
            WeightsError::Io(e) => write!(f, "failed to read weights: {e}"),
        }
    }
}

impl std::error::Error for WeightsError {}

static WEIGHTS: Lazy<NnueWeights> = Lazy::new(|| {
    if let Ok(path) = std::env::var("MERIDIAN_EVAL_FILE") {
        match NnueWeights::from_file(Path::new(&path)) {
            Ok(w) => {
                info!("loaded evaluation weights from {path}");
                return w;
            }
            Err(e) => warn!("ignoring MERIDIAN_EVAL_FILE ({path}): {e}"),
        }
    }
    NnueWeights::material()
});

/// The process-wide weight handle.
#[must_use]
pub fn weights() -> &'static NnueWeights {
    &WEIGHTS
}
