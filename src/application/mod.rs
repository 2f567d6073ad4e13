// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No tensor code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 6)
//   - Only workflow coordination

// Hyperparameters + device + seed for one model instance
pub mod settings;

// Build a model and extend a prefix token by token
pub mod generate_use_case;

// Build a model and report its structure and output shapes
pub mod inspect_use_case;
