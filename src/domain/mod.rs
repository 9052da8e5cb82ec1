// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing WHAT a detector is, with no
// tensor framework attached:
//
//   anchor.rs      - anchor box templates (grid-cell units)
//   prediction.rs  - layout of the per-cell prediction vector
//                    and the output channel count it implies
//   model_spec.rs  - which network to build and with what
//                    hyper-parameters
//   traits.rs      - abstractions other layers implement
//
// Rules for this layer:
//   - NO burn types here
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)
//            Redmon & Farhadi (2017) YOLO9000: Better, Faster, Stronger

pub mod anchor;

pub mod prediction;

pub mod model_spec;

pub mod traits;
