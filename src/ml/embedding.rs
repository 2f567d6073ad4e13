// ============================================================
// Layer 5 — Embedding Table
// ============================================================
// Maps integer token ids to dense vectors by row lookup into a
// learnable [vocab_size, embedding_dim] matrix.
//
// The matrix is drawn from U(-1, 1) instead of Burn's default
// Normal(0, 1) initialiser.
//
// Sharing: Burn parameters are reference counted and keep their
// ParamId when cloned, so passing `table.clone()` into several
// SequenceModels ties their embeddings to one parameter.

use anyhow::{ensure, Result};
use burn::{
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
};

#[derive(Config, Debug)]
pub struct EmbeddingTableConfig {
    /// Number of distinct token ids
    pub vocab_size: usize,

    /// Width of each embedding vector
    pub embedding_dim: usize,
}

impl EmbeddingTableConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmbeddingTable<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim)
            .with_initializer(Initializer::Uniform { min: -1.0, max: 1.0 })
            .init(device);

        tracing::debug!(
            "Embedding table {}x{} initialised from U(-1, 1)",
            self.vocab_size,
            self.embedding_dim,
        );

        EmbeddingTable {
            embedding,
            vocab_size:    self.vocab_size,
            embedding_dim: self.embedding_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct EmbeddingTable<B: Backend> {
    pub embedding:     Embedding<B>,
    pub vocab_size:    usize,
    pub embedding_dim: usize,
}

impl<B: Backend> EmbeddingTable<B> {
    /// ids: [batch, seq_len] → [batch, seq_len, embedding_dim]
    ///
    /// Every id must lie in `[0, vocab_size)`. Out-of-range ids are
    /// rejected before the gather rather than left to the backend.
    pub fn lookup(&self, ids: Tensor<B, 2, Int>) -> Result<Tensor<B, 3>> {
        let [batch, seq_len] = ids.dims();
        ensure!(batch * seq_len > 0, "cannot embed an empty token sequence");

        let min_id = ids.clone().min().into_scalar().elem::<i64>();
        let max_id = ids.clone().max().into_scalar().elem::<i64>();
        ensure!(
            min_id >= 0,
            "token id {} is negative (vocabulary size {})",
            min_id,
            self.vocab_size,
        );
        ensure!(
            (max_id as usize) < self.vocab_size,
            "token id {} is out of range for vocabulary size {}",
            max_id,
            self.vocab_size,
        );

        Ok(self.embedding.forward(ids))
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// The backing [vocab_size, embedding_dim] matrix
    pub fn weights(&self) -> Tensor<B, 2> {
        self.embedding.weight.val()
    }
}
