// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one.
//
// What's in this layer:
//
//   embedding.rs — Token id → vector lookup, U(-1, 1) initialised
//   init.rs      — Explicit initialisation policies for linear layers
//   model.rs     — Embedding → 2-layer LSTM → Linear → (ReLU) → LogSoftmax
//   backend.rs   — ComputeTarget → concrete Burn backend
//   sampler.rs   — Greedy / temperature choice of the next token
//   generator.rs — Autoregressive generation loop
//
// Reference: Burn Book §3 (Building Blocks)
//            Hochreiter & Schmidhuber (1997) Long Short-Term Memory

/// Learnable token embedding table
pub mod embedding;

/// Linear layer initialisation policies
pub mod init;

/// The character-level sequence model
pub mod model;

/// Backend selection and type-erased model handle
pub mod backend;

/// Next-token sampling strategies
pub mod sampler;

/// Token-by-token generation driver
pub mod generator;
