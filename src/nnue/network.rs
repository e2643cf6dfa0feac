//! Inference over the accumulator: concatenate the two halves (side to move
//! first), ReLU, one hidden layer, one output neuron. The architecture is
//! frozen, so the layers are spelled out concretely instead of being built
//! from a generic layer list.

use crate::board::Color;

use super::accumulator::Accumulator;
use super::linalg::Dense;
use super::weights::NnueWeights;
use super::{N_ACCUMULATED, N_HIDDEN};

#[inline(always)]
fn relu(x: f32) -> f32 {
    x.max(0.0)
}

impl NnueWeights {
    /// Raw network output from `us`'s point of view; the caller maps it to
    /// centipawns.
    #[must_use]
    pub fn forward(&self, acc: &Accumulator, us: Color) -> f32 {
        let own = acc.get(us);
        let other = acc.get(!us);

        let mut input = Dense::<f32, { 2 * N_ACCUMULATED }>::zeros();
        for i in 0..N_ACCUMULATED {
            input[i] = relu(own[i].to_f32());
            input[N_ACCUMULATED + i] = relu(other[i].to_f32());
        }

        let mut hidden = [0.0f32; N_HIDDEN];
        for (o, h) in hidden.iter_mut().enumerate() {
            let mut sum = self.hidden_bias[o];
            let row = self.hidden.row(o);
            for j in 0..2 * N_ACCUMULATED {
                sum += row[j] * input[j];
            }
            *h = relu(sum);
        }

        let mut out = self.output_bias;
        for (o, &h) in hidden.iter().enumerate() {
            out += self.output[o] * h;
        }
        out
    }
}
