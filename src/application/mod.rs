// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal at a time:
//
//   spec_source.rs       - turn a file or loose settings into a
//                          validated ModelSpec
//   summary_use_case.rs  - build a network and list its layers
//   forward_use_case.rs  - build a network and run a batch through it
//
// No printing here (Layer 1) and no tensor code beyond choosing a
// backend and handing it to Layer 5.

pub mod spec_source;

pub mod summary_use_case;

pub mod forward_use_case;
