// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits shared by every other layer.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// The model (Layer 5) implements NextTokenScorer; the CLI uses a
// Vocabulary to move between text and token ids. Neither side
// needs to know the other's concrete type.

// Which compute device a model should be built on
pub mod compute;

// Core abstractions (traits) that other layers implement
pub mod traits;

// A minimal character table for rendering token ids
pub mod vocabulary;
