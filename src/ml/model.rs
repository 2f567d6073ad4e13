use anyhow::{ensure, Context, Result};
use burn::{
    nn::{Linear, Lstm, LstmConfig, LstmState, Relu},
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::domain::traits::NextTokenScorer;
use crate::ml::embedding::{EmbeddingTable, EmbeddingTableConfig};
use crate::ml::init::LinearInit;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct SequenceModelConfig {
    /// Recorded for drivers; forward always runs a single sequence
    pub batch_size:    usize,
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_dim:    usize,
    #[config(default = 2)]
    pub num_layers:    usize,
    #[config(default = "LinearInit::XavierUniformZeroBias")]
    pub projection_init: LinearInit,
    /// Apply ReLU to the projected logits before log-softmax
    #[config(default = true)]
    pub rectify_logits: bool,
}

impl SequenceModelConfig {
    /// Build the model around an existing embedding table.
    ///
    /// The table may be a clone of one held elsewhere; clones share
    /// the same parameter, so the embedding is then tied.
    pub fn init<B: Backend>(
        &self,
        embedding: EmbeddingTable<B>,
        device:    &B::Device,
    ) -> Result<SequenceModel<B>> {
        ensure!(self.vocab_size > 0, "vocab_size must be positive");
        ensure!(self.embedding_dim > 0, "embedding_dim must be positive");
        ensure!(self.hidden_dim > 0, "hidden_dim must be positive");
        ensure!(self.num_layers > 0, "num_layers must be positive");
        ensure!(
            embedding.vocab_size() == self.vocab_size,
            "embedding table has {} rows but the model vocabulary is {}",
            embedding.vocab_size(),
            self.vocab_size,
        );
        ensure!(
            embedding.embedding_dim() == self.embedding_dim,
            "embedding table width {} does not match embedding_dim {}",
            embedding.embedding_dim(),
            self.embedding_dim,
        );

        // Layer 0 reads embeddings, every later layer reads the previous hidden sequence.
        let recurrent: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|layer| {
                let d_input = if layer == 0 { self.embedding_dim } else { self.hidden_dim };
                LstmConfig::new(d_input, self.hidden_dim, true).init(device)
            })
            .collect();

        let projection = self
            .projection_init
            .init(self.hidden_dim, self.vocab_size, device);
        let rectifier = self.rectify_logits.then(Relu::new);

        tracing::info!(
            "Sequence model ready: vocab={}, embedding_dim={}, hidden_dim={}, lstm_layers={}, rectify_logits={}",
            self.vocab_size,
            self.embedding_dim,
            self.hidden_dim,
            self.num_layers,
            self.rectify_logits,
        );

        Ok(SequenceModel {
            embedding,
            recurrent,
            projection,
            rectifier,
            batch_size:    self.batch_size,
            vocab_size:    self.vocab_size,
            embedding_dim: self.embedding_dim,
            hidden_dim:    self.hidden_dim,
        })
    }

    /// Build the model together with a freshly initialised embedding table.
    pub fn init_with_fresh_embedding<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<SequenceModel<B>> {
        let table = EmbeddingTableConfig::new(self.vocab_size, self.embedding_dim).init(device);
        self.init(table, device)
    }
}

#[derive(Module, Debug)]
pub struct SequenceModel<B: Backend> {
    pub embedding:     EmbeddingTable<B>,
    pub recurrent:     Vec<Lstm<B>>,
    pub projection:    Linear<B>,
    pub rectifier:     Option<Relu>,
    pub batch_size:    usize,
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_dim:    usize,
}

impl<B: Backend> SequenceModel<B> {
    /// tokens: [seq_len] or [1, seq_len] → log-probabilities
    ///
    /// Returns [seq_len, vocab_size] when `is_test` is false, otherwise
    /// only the final position as [1, vocab_size].
    ///
    /// Hidden and cell state start at zero on every call, so the result
    /// depends only on `tokens` and the current parameters.
    pub fn forward<const D: usize>(
        &self,
        tokens:  Tensor<B, D, Int>,
        is_test: bool,
    ) -> Result<Tensor<B, 2>> {
        let seq_len = tokens.shape().num_elements();
        ensure!(seq_len > 0, "cannot run the model on an empty token sequence");

        // Always a single sequence: [1, seq_len, embedding_dim]
        let batch_input = self.embedding.lookup(tokens.reshape([1, seq_len]))?;

        let mut output = batch_input;
        for (lstm, state) in self.recurrent.iter().zip(self.zero_state(&output.device())) {
            let (sequence, _final_state) = lstm.forward(output, Some(state));
            output = sequence;
        }

        let out = output.reshape([seq_len, self.hidden_dim]);
        let logits = self.projection.forward(out);
        let logits = match &self.rectifier {
            Some(relu) => relu.forward(logits),
            None => logits,
        };
        let log_probs = log_softmax(logits, 1);

        if is_test {
            Ok(log_probs.slice([seq_len - 1..seq_len, 0..self.vocab_size]))
        } else {
            Ok(log_probs)
        }
    }

    /// Same as `forward` for a plain slice of ids.
    pub fn forward_ids(&self, ids: &[usize], is_test: bool) -> Result<Tensor<B, 2>> {
        ensure!(!ids.is_empty(), "cannot run the model on an empty token sequence");
        let ints = ids
            .iter()
            .map(|&id| i32::try_from(id).with_context(|| format!("token id {id} does not fit in i32")))
            .collect::<Result<Vec<i32>>>()?;
        let tokens = Tensor::<B, 1, Int>::from_ints(ints.as_slice(), &self.device());
        self.forward(tokens, is_test)
    }

    /// One zeroed (cell, hidden) pair per LSTM layer, each [1, hidden_dim].
    fn zero_state(&self, device: &B::Device) -> Vec<LstmState<B, 2>> {
        (0..self.recurrent.len())
            .map(|_| {
                LstmState::new(
                    Tensor::zeros([1, self.hidden_dim], device),
                    Tensor::zeros([1, self.hidden_dim], device),
                )
            })
            .collect()
    }

    fn device(&self) -> B::Device {
        self.projection.weight.val().device()
    }

    pub fn num_layers(&self) -> usize {
        self.recurrent.len()
    }
}

impl<B: Backend> NextTokenScorer for SequenceModel<B> {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn next_log_probs(&self, context: &[usize]) -> Result<Vec<f32>> {
        self.forward_ids(context, true)?
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read log-probabilities: {e:?}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::NdArray, module::Param};

    use crate::ml::init::xavier_bound;

    type TestBackend = NdArray;

    fn small_config() -> SequenceModelConfig {
        SequenceModelConfig::new(1, 5, 3, 4)
    }

    fn small_model() -> SequenceModel<TestBackend> {
        small_config()
            .init_with_fresh_embedding(&Default::default())
            .unwrap()
    }

    fn rows(t: Tensor<TestBackend, 2>) -> Vec<Vec<f32>> {
        let [_, cols] = t.dims();
        t.into_data()
            .to_vec::<f32>()
            .unwrap()
            .chunks(cols)
            .map(|c| c.to_vec())
            .collect()
    }

    #[test]
    fn test_training_mode_shape_and_distributions() {
        let model = small_model();
        let out = model.forward_ids(&[0, 1, 2], false).unwrap();
        assert_eq!(out.dims(), [3, 5]);

        for row in rows(out) {
            let total: f32 = row.iter().map(|lp| lp.exp()).sum();
            assert!((total - 1.0).abs() < 1e-5, "row sums to {total}");
        }
    }

    #[test]
    fn test_generation_mode_is_last_training_row() {
        let model = small_model();
        let full = rows(model.forward_ids(&[0, 1, 2], false).unwrap());
        let last = model.forward_ids(&[0, 1, 2], true).unwrap();
        assert_eq!(last.dims(), [1, 5]);

        let last = rows(last);
        for (a, b) in last[0].iter().zip(full[2].iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let model = small_model();
        let first = rows(model.forward_ids(&[3, 1, 4, 1], false).unwrap());
        let _other = model.forward_ids(&[2, 2], false).unwrap();
        let second = rows(model.forward_ids(&[3, 1, 4, 1], false).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_batched_and_flat_inputs_agree() {
        let model = small_model();
        let device = Default::default();
        let flat = Tensor::<TestBackend, 1, Int>::from_ints([0, 4, 2], &device);
        let batched = flat.clone().reshape([1, 3]);

        let a = rows(model.forward(flat, false).unwrap());
        let b = rows(model.forward(batched, false).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_projection_initialisation() {
        let model = small_model();
        let bound = xavier_bound(4, 5) as f32;

        let weights = model.projection.weight.val().into_data().to_vec::<f32>().unwrap();
        assert_eq!(weights.len(), 20);
        assert!(weights.iter().all(|w| w.abs() <= bound + 1e-6));

        let bias = model.projection.bias.as_ref().unwrap().val();
        let bias = bias.into_data().to_vec::<f32>().unwrap();
        assert!(bias.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_library_default_projection_keeps_drawn_bias() {
        let model = small_config()
            .with_projection_init(LinearInit::LibraryDefault)
            .init_with_fresh_embedding::<TestBackend>(&Default::default())
            .unwrap();
        let bias = model.projection.bias.as_ref().unwrap().val();
        let bias = bias.into_data().to_vec::<f32>().unwrap();
        assert_eq!(bias.len(), 5);
        assert!(bias.iter().any(|&b| b != 0.0));

        let out = model.forward_ids(&[0, 1, 2], false).unwrap();
        assert_eq!(out.dims(), [3, 5]);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let device = Default::default();
        for (config, field) in [
            (SequenceModelConfig::new(1, 0, 3, 4), "vocab_size"),
            (SequenceModelConfig::new(1, 5, 0, 4), "embedding_dim"),
            (SequenceModelConfig::new(1, 5, 3, 0), "hidden_dim"),
            (SequenceModelConfig::new(1, 5, 3, 4).with_num_layers(0), "num_layers"),
        ] {
            let err = config.init_with_fresh_embedding::<TestBackend>(&device).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[test]
    fn test_embedding_initialisation_within_unit_interval() {
        let model = small_model();
        let values = model.embedding.weights().into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_token_equal_to_vocab_size_fails() {
        let model = small_model();
        assert!(model.forward_ids(&[0, 5], false).is_err());
        assert!(model.forward_ids(&[5], true).is_err());
    }

    #[test]
    fn test_empty_sequence_fails() {
        let model = small_model();
        assert!(model.forward_ids(&[], true).is_err());
        assert!(model.forward_ids(&[], false).is_err());
    }

    #[test]
    fn test_mismatched_embedding_is_rejected() {
        let device = Default::default();
        let table = EmbeddingTableConfig::new(5, 7).init::<TestBackend>(&device);
        let err = small_config().init(table, &device).unwrap_err();
        assert!(err.to_string().contains("embedding_dim"));

        let table = EmbeddingTableConfig::new(6, 3).init::<TestBackend>(&device);
        assert!(small_config().init(table, &device).is_err());
    }

    #[test]
    fn test_models_can_share_one_embedding_table() {
        let device = Default::default();
        let table = EmbeddingTableConfig::new(5, 3).init::<TestBackend>(&device);
        let a = small_config().init(table.clone(), &device).unwrap();
        let b = SequenceModelConfig::new(1, 5, 3, 6).init(table, &device).unwrap();
        assert_eq!(a.embedding.embedding.weight.id, b.embedding.embedding.weight.id);
    }

    #[test]
    fn test_default_stack_has_two_layers() {
        let model = small_model();
        assert_eq!(model.num_layers(), 2);
        assert_eq!(model.batch_size, 1);
    }

    // Zero weights and strictly negative biases give negative logits for every
    // position. Rectified, they all become 0 and the distribution is uniform.
    fn with_negative_logits(model: SequenceModel<TestBackend>) -> SequenceModel<TestBackend> {
        let device = Default::default();
        let mut model = model;
        model.projection.weight = Param::from_tensor(model.projection.weight.val().zeros_like());
        model.projection.bias = Some(Param::from_tensor(Tensor::<TestBackend, 1>::from_floats(
            [-1.0, -2.0, -3.0, -4.0, -5.0],
            &device,
        )));
        model
    }

    #[test]
    fn test_rectifier_flattens_negative_logits() {
        let model = with_negative_logits(small_model());
        let uniform = -(5.0f32).ln();
        for row in rows(model.forward_ids(&[0, 1], false).unwrap()) {
            assert!(row.iter().all(|lp| (lp - uniform).abs() < 1e-5));
        }
    }

    #[test]
    fn test_without_rectifier_negative_logits_are_kept() {
        let model = small_config()
            .with_rectify_logits(false)
            .init_with_fresh_embedding::<TestBackend>(&Default::default())
            .unwrap();
        let model = with_negative_logits(model);
        let row = &rows(model.forward_ids(&[0, 1], true).unwrap())[0];
        // Higher bias, higher log-probability
        assert!(row.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_scorer_returns_next_distribution() {
        let model = small_model();
        let probs = model.next_log_probs(&[1, 2]).unwrap();
        assert_eq!(probs.len(), 5);
        let total: f32 = probs.iter().map(|lp| lp.exp()).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
