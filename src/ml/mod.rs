// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All burn-specific code lives here. No other layer builds
// tensors or modules directly.
//
//   reorg.rs     - space-to-depth used by the passthrough branch
//   conv.rs      - conv [+ batch norm] [+ leaky ReLU] block
//   stage.rs     - runs of conv blocks with 2x2 pooling
//   init.rs      - explicit conv-weight handles and the
//                  Xavier-normal initialisation pass
//   detector.rs  - the trait both networks implement
//   darknet.rs   - Darknet-19 YOLOv2 with passthrough
//   tiny.rs      - Tiny YOLOv2
//
// Every network is generic over the burn Backend, so the same
// code runs on NdArray (CPU), Wgpu and Autodiff<_> wrappers.
//
// Reference: Burn Book §3 (Building Blocks)
//            Redmon & Farhadi (2017) YOLO9000

pub mod reorg;

pub mod conv;

pub mod stage;

pub mod init;

pub mod detector;

pub mod darknet;

pub mod tiny;
