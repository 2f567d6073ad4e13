//! Character-level poetry model: token embedding, stacked LSTM,
//! linear projection and log-softmax, built on Burn.
//!
//! The model is stateless between calls: every forward pass starts the
//! recurrent stack from zero hidden and cell state.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ml;

pub use ml::embedding::{EmbeddingTable, EmbeddingTableConfig};
pub use ml::model::{SequenceModel, SequenceModelConfig};
