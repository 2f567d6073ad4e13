// ============================================================
// Layer 6 — Config Store
// ============================================================
// Saves and loads ModelSettings as pretty-printed JSON.
//
// Example file:
//   {
//     "batch_size": 64,
//     "vocab_size": 128,
//     "embedding_dim": 100,
//     "hidden_dim": 128,
//     "num_layers": 2,
//     "rectify_logits": true,
//     "projection_init": "XavierUniformZeroBias",
//     "device": "auto",
//     "seed": 42
//   }
//
// Missing fields fall back to ModelSettings::default().

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::settings::ModelSettings;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, settings: &ModelSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved model settings to '{}'", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<ModelSettings> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;

        let settings = serde_json::from_str(&json)
            .with_context(|| format!("Invalid model settings in '{}'", self.path.display()))?;

        tracing::debug!("Loaded model settings from '{}'", self.path.display());
        Ok(settings)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
