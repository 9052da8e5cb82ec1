// ============================================================
// Layer 5 - Detector Trait
// ============================================================
// What the application layer needs from a network, independent
// of which backbone it is.

use burn::prelude::*;

use crate::ml::init::ConvParams;

pub trait Detector<B: Backend>: Module<B> + ConvParams<B> {
    /// `[N, 3, H, W]` images → `[N, output_channels, H/32, W/32]` grid
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4>;

    /// Channels per grid cell produced by the head
    fn output_channels(&self) -> usize;

    /// Total spatial stride between input and output grid
    fn downsample_factor(&self) -> usize {
        32
    }
}
