// ============================================================
// Layer 5 — Linear Initialisation Policies
// ============================================================
// Every fully-connected sublayer is built through a LinearInit
// policy chosen explicitly by whoever constructs it. There is
// no post-hoc walk over the module tree and no matching on
// type names: the pairing (layer, policy) is visible at the
// construction site.
//
// Policies:
//   LibraryDefault        — Burn's own LinearConfig initialiser
//   XavierUniformZeroBias — W ~ U(-b, b), b = sqrt(6 / (fan_in + fan_out))
//                           bias = 0 exactly
//
// Reference: Glorot & Bengio (2010) Understanding the difficulty
//            of training deep feedforward neural networks

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// How a linear sublayer's weight and bias are initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinearInit {
    /// Leave the layer at Burn's default initialiser.
    LibraryDefault,

    /// Glorot uniform weights, zero bias.
    #[default]
    XavierUniformZeroBias,
}

impl LinearInit {
    /// Build a `d_input -> d_output` linear layer (with bias) under this policy.
    pub fn init<B: Backend>(
        &self,
        d_input:  usize,
        d_output: usize,
        device:   &B::Device,
    ) -> Linear<B> {
        match self {
            LinearInit::LibraryDefault => LinearConfig::new(d_input, d_output).init(device),
            LinearInit::XavierUniformZeroBias => {
                // Burn's XavierUniform already computes gain * sqrt(6 / (fan_in + fan_out))
                // from the layer's own fan values; it would also draw the bias, so
                // the bias is replaced afterwards.
                let mut linear = LinearConfig::new(d_input, d_output)
                    .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                    .init(device);
                linear.bias = Some(Initializer::Zeros.init([d_output], device));

                tracing::debug!(
                    "Initialised linear {}x{} with Xavier uniform (bound={:.5}), zero bias",
                    d_input,
                    d_output,
                    xavier_bound(d_input, d_output),
                );
                linear
            }
        }
    }
}

/// Half-width of the Glorot uniform interval for a layer with the given fans.
pub fn xavier_bound(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}
