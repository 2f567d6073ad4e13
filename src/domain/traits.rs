// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The model only ever sees integer ids, and a generation driver
// only needs "give me the next-token distribution". These two
// seams are captured here so each side can be swapped or faked
// in tests.

use anyhow::{anyhow, Result};

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Bidirectional mapping between characters and token ids.
///
/// Ids are dense: every id in `0..vocab_size()` maps to a symbol.
pub trait Vocabulary {
    fn vocab_size(&self) -> usize;

    fn id_of(&self, symbol: char) -> Option<usize>;

    fn symbol_of(&self, id: usize) -> Option<char>;

    /// Encode every character of `text`; unknown characters are an error.
    fn encode(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .map(|c| {
                self.id_of(c)
                    .ok_or_else(|| anyhow!("character {c:?} is not in the vocabulary"))
            })
            .collect()
    }

    /// Decode ids to text, skipping ids with no symbol.
    fn decode(&self, ids: &[usize]) -> String {
        ids.iter().filter_map(|&id| self.symbol_of(id)).collect()
    }
}

// ─── NextTokenScorer ──────────────────────────────────────────────────────────
/// Anything that can score the token following a context.
///
/// Implementations:
///   - SequenceModel → runs the embedding + LSTM + projection stack
pub trait NextTokenScorer {
    fn vocab_size(&self) -> usize;

    /// Log-probabilities (length `vocab_size()`) for the next token.
    fn next_log_probs(&self, context: &[usize]) -> Result<Vec<f32>>;
}
