// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// Maps a ComputeTarget onto a concrete Burn backend and hands
// the built model back as a trait object, so the layers above
// never name a backend type:
//
//   Cpu  → NdArray
//   Gpu  → Wgpu, first discrete adapter
//   Auto → Wgpu, default adapter selection (falls back to a
//          software adapter when no GPU is present)

use anyhow::{anyhow, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::domain::{compute::ComputeTarget, traits::NextTokenScorer};
use crate::ml::model::{SequenceModel, SequenceModelConfig};

/// Shape and size facts about a built model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub device:        String,
    pub batch_size:    usize,
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_dim:    usize,
    pub lstm_layers:   usize,
    pub num_params:    usize,
}

/// A model built on some backend, usable without knowing which.
pub trait LoadedModel: NextTokenScorer {
    fn summary(&self) -> ModelSummary;

    /// Training-mode output: one log-probability row per input position.
    fn score_sequence(&self, ids: &[usize]) -> Result<Vec<Vec<f32>>>;
}

impl<B: Backend> LoadedModel for SequenceModel<B> {
    fn summary(&self) -> ModelSummary {
        ModelSummary {
            device:        format!("{:?}", self.projection.weight.val().device()),
            batch_size:    self.batch_size,
            vocab_size:    self.vocab_size,
            embedding_dim: self.embedding_dim,
            hidden_dim:    self.hidden_dim,
            lstm_layers:   self.num_layers(),
            num_params:    self.num_params(),
        }
    }

    fn score_sequence(&self, ids: &[usize]) -> Result<Vec<Vec<f32>>> {
        let values = self
            .forward_ids(ids, false)?
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read log-probabilities: {e:?}"))?;
        Ok(values.chunks(self.vocab_size).map(<[f32]>::to_vec).collect())
    }
}

/// Build a freshly initialised model on the requested target.
///
/// `seed` seeds the backend RNG before any parameter is drawn, so the
/// same (config, target, seed) triple gives the same initial weights.
pub fn build_model(
    target: ComputeTarget,
    config: &SequenceModelConfig,
    seed:   u64,
) -> Result<Box<dyn LoadedModel>> {
    tracing::info!("Building model on compute target '{}'", target);
    match target {
        ComputeTarget::Cpu  => build_on::<NdArray>(NdArrayDevice::Cpu, config, seed),
        ComputeTarget::Gpu  => build_on::<Wgpu>(WgpuDevice::DiscreteGpu(0), config, seed),
        ComputeTarget::Auto => build_on::<Wgpu>(WgpuDevice::default(), config, seed),
    }
}

fn build_on<B: Backend>(
    device: B::Device,
    config: &SequenceModelConfig,
    seed:   u64,
) -> Result<Box<dyn LoadedModel>> {
    tracing::debug!("Using device: {:?}", device);
    B::seed(&device, seed);
    let model = config.init_with_fresh_embedding::<B>(&device)?;
    Ok(Box::new(model))
}
