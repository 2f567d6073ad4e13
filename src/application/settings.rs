// ============================================================
// Layer 2 — Model Settings
// ============================================================
// Everything needed to build one SequenceModel: dimensions, the
// compute target, and the RNG seed. Serialisable so it can be
// kept in a JSON file and reused between runs.

use serde::{Deserialize, Serialize};

use crate::domain::compute::ComputeTarget;
use crate::ml::{init::LinearInit, model::SequenceModelConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub batch_size:      usize,
    pub vocab_size:      usize,
    pub embedding_dim:   usize,
    pub hidden_dim:      usize,
    pub num_layers:      usize,
    pub rectify_logits:  bool,
    pub projection_init: LinearInit,
    pub device:          ComputeTarget,
    pub seed:            u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            batch_size:      64,
            vocab_size:      128,
            embedding_dim:   100,
            hidden_dim:      128,
            num_layers:      2,
            rectify_logits:  true,
            projection_init: LinearInit::XavierUniformZeroBias,
            device:          ComputeTarget::Auto,
            seed:            42,
        }
    }
}

impl ModelSettings {
    /// The Burn-side model config these settings describe
    pub fn model_config(&self) -> SequenceModelConfig {
        SequenceModelConfig::new(
            self.batch_size,
            self.vocab_size,
            self.embedding_dim,
            self.hidden_dim,
        )
        .with_num_layers(self.num_layers)
        .with_rectify_logits(self.rectify_logits)
        .with_projection_init(self.projection_init)
    }
}
