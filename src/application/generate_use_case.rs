// ============================================================
// Layer 2 — GenerateUseCase
// ============================================================
// Pipeline:
//
//   Step 1: Build the model on the configured device   (Layer 5)
//   Step 2: Seed the sampling RNG from the settings
//   Step 3: Extend the prefix until end token / max_len (Layer 5)

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};

use crate::application::settings::ModelSettings;
use crate::ml::{
    backend::build_model,
    generator::{generate, GenerationOptions},
};

pub struct GenerateUseCase {
    settings: ModelSettings,
    options:  GenerationOptions,
}

impl GenerateUseCase {
    pub fn new(settings: ModelSettings, options: GenerationOptions) -> Self {
        Self { settings, options }
    }

    /// Returns the prefix followed by the generated ids.
    pub fn execute(&self, prefix: &[usize]) -> Result<Vec<usize>> {
        if let Some(end) = self.options.end_token {
            ensure!(
                end < self.settings.vocab_size,
                "end token {} is outside the vocabulary of {}",
                end,
                self.settings.vocab_size,
            );
        }

        let model = build_model(
            self.settings.device,
            &self.settings.model_config(),
            self.settings.seed,
        )?;

        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        tracing::info!(
            "Generating up to {} tokens with {:?}",
            self.options.max_len,
            self.options.sampling,
        );
        generate(model.as_ref(), prefix, &self.options, &mut rng)
    }
}
