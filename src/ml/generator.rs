// ============================================================
// Layer 5 — Autoregressive Generation
// ============================================================
// Repeatedly asks a scorer for the distribution following the
// current sequence, picks a token, appends it, and stops on the
// end token or the length cap.
//
// The whole growing sequence is re-scored at every step: the
// model keeps no state between calls, so nothing is carried over.

use anyhow::{ensure, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::traits::NextTokenScorer;
use crate::ml::sampler::Sampling;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum length of the returned sequence, prefix included
    pub max_len:   usize,

    /// Generation stops right after this id is emitted
    pub end_token: Option<usize>,

    pub sampling:  Sampling,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_len:   50,
            end_token: None,
            sampling:  Sampling::Greedy,
        }
    }
}

/// Extend `prefix` token by token. Returns prefix + generated ids.
pub fn generate<S, R>(
    scorer:  &S,
    prefix:  &[usize],
    options: &GenerationOptions,
    rng:     &mut R,
) -> Result<Vec<usize>>
where
    S: NextTokenScorer + ?Sized,
    R: Rng + ?Sized,
{
    ensure!(!prefix.is_empty(), "generation needs at least one prefix token");

    let mut sequence = prefix.to_vec();
    while sequence.len() < options.max_len {
        let log_probs = scorer.next_log_probs(&sequence)?;
        ensure!(
            log_probs.len() == scorer.vocab_size(),
            "scorer returned {} log-probabilities for a vocabulary of {}",
            log_probs.len(),
            scorer.vocab_size(),
        );

        let next = options.sampling.pick(&log_probs, rng)?;
        sequence.push(next);
        tracing::trace!("step {}: emitted {}", sequence.len(), next);

        if options.end_token == Some(next) {
            break;
        }
    }

    tracing::debug!(
        "Generated {} tokens from a prefix of {}",
        sequence.len() - prefix.len(),
        prefix.len(),
    );
    Ok(sequence)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use rand::{rngs::StdRng, SeedableRng};
    use std::cell::RefCell;

    use crate::ml::model::SequenceModelConfig;

    /// Always predicts (last id + 1) mod vocab, recording every context it saw.
    struct Counter {
        vocab: usize,
        seen:  RefCell<Vec<Vec<usize>>>,
    }

    impl NextTokenScorer for Counter {
        fn vocab_size(&self) -> usize {
            self.vocab
        }

        fn next_log_probs(&self, context: &[usize]) -> Result<Vec<f32>> {
            self.seen.borrow_mut().push(context.to_vec());
            let next = (context[context.len() - 1] + 1) % self.vocab;
            Ok((0..self.vocab)
                .map(|i| if i == next { 0.0 } else { f32::NEG_INFINITY })
                .collect())
        }
    }

    fn counter(vocab: usize) -> Counter {
        Counter { vocab, seen: RefCell::new(Vec::new()) }
    }

    #[test]
    fn test_stops_at_max_len() {
        let scorer = counter(10);
        let mut rng = StdRng::seed_from_u64(0);
        let opts = GenerationOptions { max_len: 5, ..Default::default() };
        let out = generate(&scorer, &[0], &opts, &mut rng).unwrap();
        assert_eq!(out, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_stops_after_end_token() {
        let scorer = counter(10);
        let mut rng = StdRng::seed_from_u64(0);
        let opts = GenerationOptions { max_len: 50, end_token: Some(3), ..Default::default() };
        let out = generate(&scorer, &[1], &opts, &mut rng).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_whole_sequence_is_rescored_each_step() {
        let scorer = counter(10);
        let mut rng = StdRng::seed_from_u64(0);
        let opts = GenerationOptions { max_len: 4, ..Default::default() };
        generate(&scorer, &[5, 6], &opts, &mut rng).unwrap();
        assert_eq!(*scorer.seen.borrow(), vec![vec![5, 6], vec![5, 6, 7]]);
    }

    #[test]
    fn test_long_prefix_is_returned_unchanged() {
        let scorer = counter(10);
        let mut rng = StdRng::seed_from_u64(0);
        let opts = GenerationOptions { max_len: 2, ..Default::default() };
        let out = generate(&scorer, &[1, 2, 3], &opts, &mut rng).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
        assert!(scorer.seen.borrow().is_empty());
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let scorer = counter(3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate(&scorer, &[], &GenerationOptions::default(), &mut rng).is_err());
    }

    #[test]
    fn test_generates_valid_ids_with_real_model() {
        let model = SequenceModelConfig::new(1, 6, 4, 8)
            .init_with_fresh_embedding::<NdArray>(&Default::default())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let opts = GenerationOptions {
            max_len:   8,
            end_token: None,
            sampling:  Sampling::Temperature(1.0),
        };
        let out = generate(&model, &[0], &opts, &mut rng).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], 0);
        assert!(out.iter().all(|&id| id < 6));
    }

    #[test]
    fn test_greedy_generation_is_deterministic_for_a_model() {
        let model = SequenceModelConfig::new(1, 6, 4, 8)
            .init_with_fresh_embedding::<NdArray>(&Default::default())
            .unwrap();
        let opts = GenerationOptions { max_len: 6, ..Default::default() };
        let a = generate(&model, &[2], &opts, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate(&model, &[2], &opts, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
