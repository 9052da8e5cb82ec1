// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting helpers used by the use cases:
//
//   config_store.rs - ModelSpec ⇄ JSON file
//   summary.rs      - printable inventory of a built network
//
// Reference: Rust Book §9 (Error Handling with anyhow)

pub mod config_store;

pub mod summary;
