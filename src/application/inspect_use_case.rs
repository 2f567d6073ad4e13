// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Builds a model and runs one probe sequence through both output
// modes, reporting what a driver would rely on: output shapes,
// per-row probability mass, and whether generation mode agrees
// with the last training-mode row.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::application::settings::ModelSettings;
use crate::ml::{
    backend::{build_model, ModelSummary},
    sampler::argmax,
};

/// Largest difference tolerated between the two output modes
const MODE_TOLERANCE: f32 = 1e-5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    pub summary:         ModelSummary,
    pub probe:           Vec<usize>,
    /// [seq_len, vocab_size] of the training-mode output
    pub train_shape:     [usize; 2],
    /// [1, vocab_size] of the generation-mode output
    pub test_shape:      [usize; 2],
    /// sum(exp(row)) for each training-mode row
    pub row_mass:        Vec<f32>,
    pub modes_agree:     bool,
    pub next_token:      usize,
}

pub struct InspectUseCase {
    settings: ModelSettings,
}

impl InspectUseCase {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }

    pub fn execute(&self, probe: &[usize]) -> Result<InspectReport> {
        ensure!(!probe.is_empty(), "probe sequence must not be empty");

        let model = build_model(
            self.settings.device,
            &self.settings.model_config(),
            self.settings.seed,
        )?;
        let summary = model.summary();

        let rows = model.score_sequence(probe)?;
        let next = model.next_log_probs(probe)?;

        let row_mass: Vec<f32> = rows
            .iter()
            .map(|row| row.iter().map(|lp| lp.exp()).sum())
            .collect();

        let modes_agree = rows
            .last()
            .map(|last| {
                last.len() == next.len()
                    && last.iter().zip(&next).all(|(a, b)| (a - b).abs() <= MODE_TOLERANCE)
            })
            .unwrap_or(false);

        let next_token = argmax(&next);

        tracing::debug!("Probe of {} tokens, modes_agree={}", probe.len(), modes_agree);

        Ok(InspectReport {
            train_shape: [rows.len(), summary.vocab_size],
            test_shape:  [1, next.len()],
            summary,
            probe: probe.to_vec(),
            row_mass,
            modes_agree,
            next_token,
        })
    }
}
