// ============================================================
// Layer 5 - Convolution Blocks
// ============================================================
// Every layer of both backbones is one of two shapes:
//
//   plain:       conv (with bias) → [leaky ReLU]
//   batch-norm:  conv (no bias)   → batch norm → [leaky ReLU]
//
// Both are the same ConvBlock; `normalize` picks which. Batch
// norm carries its own shift, so the conv bias is dropped when
// it is present.
//
// Padding: with `same_padding` a stride-1 conv keeps H and W
// (padding = (k - 1) / 2, exact for odd k), otherwise no padding.
//
// Reference: Burn Book §3 (Building Blocks)
//            Ioffe & Szegedy (2015) Batch Normalization

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d,
    },
    prelude::*,
    tensor::activation,
};

/// Negative slope of every leaky ReLU in the network
pub const LEAKY_SLOPE: f64 = 0.1;

/// Running-statistics momentum of every batch norm
pub const BATCH_NORM_MOMENTUM: f64 = 0.01;

#[derive(Config, Debug)]
pub struct ConvBlockConfig {
    /// [in_channels, out_channels]
    pub channels:     [usize; 2],
    pub kernel_size:  usize,
    #[config(default = 1)]
    pub stride:       usize,
    /// Insert batch norm after the conv (and drop the conv bias)
    #[config(default = true)]
    pub normalize:    bool,
    /// Finish with a leaky ReLU
    #[config(default = true)]
    pub activate:     bool,
    #[config(default = false)]
    pub same_padding: bool,
}

impl ConvBlockConfig {
    /// Conv → BN → leaky ReLU with size-preserving padding
    pub fn batch_norm(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self::new([in_channels, out_channels], kernel_size).with_same_padding(true)
    }

    /// Conv with bias and nothing after it (detection head)
    pub fn linear(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self::new([in_channels, out_channels], kernel_size)
            .with_normalize(false)
            .with_activate(false)
    }

    pub fn padding(&self) -> usize {
        if self.same_padding { (self.kernel_size - 1) / 2 } else { 0 }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvBlock<B> {
        let padding = self.padding();
        let conv = Conv2dConfig::new(self.channels, [self.kernel_size, self.kernel_size])
            .with_stride([self.stride, self.stride])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_bias(!self.normalize)
            .init(device);

        let bn = self.normalize.then(|| {
            BatchNormConfig::new(self.channels[1])
                .with_momentum(BATCH_NORM_MOMENTUM)
                .init(device)
        });

        ConvBlock { conv, bn, activate: self.activate }
    }
}

#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv:     Conv2d<B>,
    pub bn:       Option<BatchNorm<B>>,
    pub activate: bool,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = match &self.bn {
            Some(bn) => bn.forward(x),
            None     => x,
        };
        if self.activate {
            activation::leaky_relu(x, LEAKY_SLOPE)
        } else {
            x
        }
    }

    /// Number of feature maps this block produces
    pub fn out_channels(&self) -> usize {
        self.conv.weight.val().dims()[0]
    }
}
