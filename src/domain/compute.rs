// ============================================================
// Layer 3 — Compute Target
// ============================================================
// The device a model is built on is an explicit value passed in
// by the caller, never detected behind its back. Tests can pin
// `Cpu` and get the same backend every run.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeTarget {
    /// Let the GPU backend choose its best adapter (may be a software one)
    #[default]
    Auto,

    /// Pure CPU backend
    Cpu,

    /// First discrete GPU
    Gpu,
}

impl fmt::Display for ComputeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComputeTarget::Auto => "auto",
            ComputeTarget::Cpu  => "cpu",
            ComputeTarget::Gpu  => "gpu",
        };
        f.write_str(name)
    }
}

impl FromStr for ComputeTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ComputeTarget::Auto),
            "cpu"  => Ok(ComputeTarget::Cpu),
            "gpu" | "cuda" => Ok(ComputeTarget::Gpu),
            other => anyhow::bail!("unknown compute target '{other}' (expected auto, cpu or gpu)"),
        }
    }
}
