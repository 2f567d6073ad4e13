// ============================================================
// Layer 5 — Next-Token Sampling
// ============================================================
// Turns one log-probability row from the model into a token id.
//
//   Greedy         — argmax (ties resolve to the lowest id)
//   Temperature(t) — draw from softmax(log_p / t); t < 1 sharpens,
//                    t > 1 flattens the distribution
//
// Works on plain f32 slices so it is independent of the backend.

use anyhow::{ensure, Context, Result};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Sampling {
    #[default]
    Greedy,
    Temperature(f32),
}

impl Sampling {
    /// Pick the next token id from a row of log-probabilities.
    pub fn pick<R: Rng + ?Sized>(&self, log_probs: &[f32], rng: &mut R) -> Result<usize> {
        ensure!(!log_probs.is_empty(), "cannot sample from an empty distribution");

        match *self {
            Sampling::Greedy => Ok(argmax(log_probs)),
            Sampling::Temperature(t) => {
                ensure!(t > 0.0 && t.is_finite(), "temperature must be positive, got {t}");

                // Shift by the max before exponentiating to stay in range
                let max = log_probs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let weights: Vec<f32> = log_probs
                    .iter()
                    .map(|lp| ((lp - max) / t).exp())
                    .collect();

                let dist = WeightedIndex::new(&weights)
                    .context("log-probabilities do not form a valid distribution")?;
                Ok(dist.sample(rng))
            }
        }
    }
}

/// Index of the largest value; ties go to the lowest index.
pub(crate) fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best_i, best_v) }
        })
        .0
}
