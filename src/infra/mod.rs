// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem.
//
//   config_store.rs — Reads and writes ModelSettings as JSON so a
//                     model can be rebuilt with the same
//                     dimensions, device and seed later.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// ModelSettings JSON persistence
pub mod config_store;
