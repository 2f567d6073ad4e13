// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `generate`, `inspect` and `init-config`.
//
// Model flags are shared through ModelArgs. Each one is optional:
// values come from --config (or the built-in defaults) and any
// flag given on the command line overrides them.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::application::settings::ModelSettings;
use crate::domain::compute::ComputeTarget;
use crate::infra::config_store::ConfigStore;
use crate::ml::{generator::GenerationOptions, init::LinearInit, sampler::Sampling};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a token sequence from a prefix
    Generate(GenerateArgs),

    /// Print model structure and check both output modes on a probe
    Inspect(InspectArgs),

    /// Write the resolved model settings to a JSON file
    InitConfig(InitConfigArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    Auto,
    Cpu,
    Gpu,
}

impl From<DeviceArg> for ComputeTarget {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Auto => ComputeTarget::Auto,
            DeviceArg::Cpu  => ComputeTarget::Cpu,
            DeviceArg::Gpu  => ComputeTarget::Gpu,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ProjectionInitArg {
    /// Burn's default linear initialiser
    Default,
    /// Glorot uniform weights, zero bias
    Xavier,
}

impl From<ProjectionInitArg> for LinearInit {
    fn from(p: ProjectionInitArg) -> Self {
        match p {
            ProjectionInitArg::Default => LinearInit::LibraryDefault,
            ProjectionInitArg::Xavier  => LinearInit::XavierUniformZeroBias,
        }
    }
}

/// Model dimensions, device and seed.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// JSON settings file to start from
    #[arg(long)]
    pub config: Option<String>,

    /// Stored on the model; forward always runs one sequence
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Number of distinct token ids
    #[arg(long)]
    pub vocab_size: Option<usize>,

    #[arg(long)]
    pub embedding_dim: Option<usize>,

    /// LSTM hidden width
    #[arg(long)]
    pub hidden_dim: Option<usize>,

    /// Number of stacked LSTM layers
    #[arg(long)]
    pub num_layers: Option<usize>,

    /// Skip the ReLU applied to logits before log-softmax
    #[arg(long)]
    pub no_rectify: bool,

    /// Initialisation of the output projection
    #[arg(long, value_enum)]
    pub projection_init: Option<ProjectionInitArg>,

    #[arg(long, value_enum)]
    pub device: Option<DeviceArg>,

    /// Seeds parameter initialisation and sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ModelArgs {
    /// Settings from --config (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<ModelSettings> {
        let mut s = match &self.config {
            Some(path) => ConfigStore::new(path).load()?,
            None => ModelSettings::default(),
        };

        if let Some(v) = self.batch_size    { s.batch_size = v; }
        if let Some(v) = self.vocab_size    { s.vocab_size = v; }
        if let Some(v) = self.embedding_dim { s.embedding_dim = v; }
        if let Some(v) = self.hidden_dim    { s.hidden_dim = v; }
        if let Some(v) = self.num_layers    { s.num_layers = v; }
        if let Some(v) = self.projection_init { s.projection_init = v.into(); }
        if let Some(v) = self.device        { s.device = v.into(); }
        if let Some(v) = self.seed          { s.seed = v; }
        if self.no_rectify {
            s.rectify_logits = false;
        }
        Ok(s)
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Comma-separated prefix ids, e.g. "0,4,2"
    #[arg(long, default_value = "0", conflicts_with = "alphabet")]
    pub prefix: String,

    /// Characters of a character vocabulary (begin/end markers G/E are added)
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Text to continue after the begin marker; needs --alphabet
    #[arg(long, requires = "alphabet")]
    pub text: Option<String>,

    /// Maximum output length, prefix included
    #[arg(long, default_value_t = 50)]
    pub max_len: usize,

    /// Stop after this id is produced
    #[arg(long)]
    pub end_token: Option<usize>,

    /// Sample at this temperature instead of taking the argmax
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl GenerateArgs {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            max_len:   self.max_len,
            end_token: self.end_token,
            sampling:  self.temperature.map_or(Sampling::Greedy, Sampling::Temperature),
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Comma-separated probe ids
    #[arg(long, default_value = "0,1,2")]
    pub probe: String,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Where to write the settings
    #[arg(long, default_value = "model.json")]
    pub out: String,
}

/// Parse "0, 4,2" into ids.
pub fn parse_ids(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .with_context(|| format!("'{part}' is not a token id"))
        })
        .collect()
}
