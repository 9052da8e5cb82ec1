// ============================================================
// Layer 5 - Darknet-19 YOLOv2
// ============================================================
// Three sequential stages plus a passthrough branch:
//
//   input ─ layers1 ─┬─ passthrough (1x1 → 64) ─ reorg(s) ─┐
//         (stride 16) │                                      ├─ cat ─ layers3 ─ output
//                     └─ layers2 (pool, stride 32) ─────────┘
//
// For a 416x416 input: layers1 → 512 x 26 x 26,
//   passthrough + reorg(2) → 256 x 13 x 13, layers2 → 1024 x 13 x 13,
//   cat → 1280 x 13 x 13, layers3 → output_channels x 13 x 13.
//
// The concatenation only lines up when reorg shrinks the stride-16
// map by exactly the one extra halving of layers2, i.e. stride 2.
//
// Reference: Redmon & Farhadi (2017) YOLO9000, Table 6 (Darknet-19)

use burn::{module::Param, prelude::*};

use crate::domain::anchor::Anchor;
use crate::domain::prediction::output_channels;
use crate::ml::conv::{ConvBlock, ConvBlockConfig};
use crate::ml::detector::Detector;
use crate::ml::init::{xavier_normal_pass, ConvParams};
use crate::ml::reorg::reorg;
use crate::ml::stage::{forward_stages, ConvStage};

/// Width of the passthrough projection before reorg
pub const PASSTHROUGH_CHANNELS: usize = 64;

#[derive(Config, Debug)]
pub struct DarknetConfig {
    pub anchors:     Vec<Anchor>,
    pub num_classes: usize,
    /// Reorg stride of the passthrough branch
    #[config(default = 2)]
    pub stride:      usize,
}

impl DarknetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Darknet<B> {
        let conv3 = |i: usize, o: usize| ConvBlockConfig::batch_norm(i, o, 3).init::<B>(device);
        let conv1 = |i: usize, o: usize| ConvBlockConfig::batch_norm(i, o, 1).init::<B>(device);

        let mut channels_in = 3;
        let mut channels_out = 32;

        // ── layers1 ───────────────────────────────────────────────────────────
        let mut layers1 = Vec::new();
        // down 4
        for _ in 0..2 {
            layers1.push(ConvStage::pooled(vec![conv3(channels_in, channels_out)]));
            channels_in = channels_out;
            channels_out *= 2;
        }
        // down 16
        for _ in 0..2 {
            let bottleneck = channels_out / 2;
            layers1.push(ConvStage::pooled(vec![
                conv3(channels_in, channels_out),
                conv1(channels_out, bottleneck),
                conv3(bottleneck, channels_out),
            ]));
            channels_in = channels_out;
            channels_out *= 2;
        }
        let mut convs = Vec::new();
        for _ in 0..2 {
            convs.push(conv3(channels_in, channels_out));
            convs.push(conv1(channels_out, channels_out / 2));
            channels_in = channels_out / 2;
        }
        convs.push(conv3(channels_in, channels_out));
        channels_in = channels_out;
        layers1.push(ConvStage::plain(convs));
        let fine_channels = channels_in;

        // ── layers2 ───────────────────────────────────────────────────────────
        channels_out *= 2;
        let mut convs = Vec::new();
        // down 32
        for _ in 0..2 {
            convs.push(conv3(channels_in, channels_out));
            convs.push(conv1(channels_out, channels_out / 2));
            channels_in = channels_out / 2;
        }
        for _ in 0..3 {
            convs.push(conv3(channels_in, channels_out));
            channels_in = channels_out;
        }
        let layers2 = ConvStage::pool_first(convs);

        let passthrough = ConvBlockConfig::new([fine_channels, PASSTHROUGH_CHANNELS], 1).init(device);

        // ── layers3 ───────────────────────────────────────────────────────────
        channels_in += PASSTHROUGH_CHANNELS * self.stride * self.stride;
        let fuse = conv3(channels_in, 1024);
        let head = ConvBlockConfig::linear(1024, output_channels(self.anchors.len(), self.num_classes), 1)
            .init(device);

        xavier_normal_pass(Darknet {
            layers1,
            layers2,
            passthrough,
            fuse,
            head,
            stride: self.stride,
        })
    }
}

#[derive(Module, Debug)]
pub struct Darknet<B: Backend> {
    /// Stride-16 trunk (ends at 512 channels)
    pub layers1:     Vec<ConvStage<B>>,
    /// Stride-32 trunk (ends at 1024 channels)
    pub layers2:     ConvStage<B>,
    pub passthrough: ConvBlock<B>,
    /// layers3: 3x3 fusion conv over the concatenated maps ...
    pub fuse:        ConvBlock<B>,
    /// ... then the 1x1 linear prediction conv
    pub head:        ConvBlock<B>,
    pub stride:      usize,
}

impl<B: Backend> Darknet<B> {
    /// The two maps that get concatenated, in concat order:
    /// `(reorg(passthrough(layers1)), layers2(layers1))`.
    pub fn forward_branches(&self, images: Tensor<B, 4>) -> (Tensor<B, 4>, Tensor<B, 4>) {
        let x = forward_stages(&self.layers1, images);
        let fine = reorg(self.passthrough.forward(x.clone()), self.stride, self.stride);
        let coarse = self.layers2.forward(x);
        (fine, coarse)
    }
}

impl<B: Backend> Detector<B> for Darknet<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let (fine, coarse) = self.forward_branches(images);
        let x = Tensor::cat(vec![fine, coarse], 1);
        self.head.forward(self.fuse.forward(x))
    }

    fn output_channels(&self) -> usize {
        self.head.out_channels()
    }
}

impl<B: Backend> ConvParams<B> for Darknet<B> {
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>> {
        let mut weights = self.layers1.conv_weights();
        weights.extend(self.layers2.conv_weights());
        weights.extend(self.passthrough.conv_weights());
        weights.extend(self.fuse.conv_weights());
        weights.extend(self.head.conv_weights());
        weights
    }

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>> {
        let mut weights = self.layers1.conv_weights_mut();
        weights.extend(self.layers2.conv_weights_mut());
        weights.extend(self.passthrough.conv_weights_mut());
        weights.extend(self.fuse.conv_weights_mut());
        weights.extend(self.head.conv_weights_mut());
        weights
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn build(num_classes: usize) -> Darknet<TestBackend> {
        DarknetConfig::new(Anchor::voc(), num_classes).init(&Default::default())
    }

    fn images(size: usize) -> Tensor<TestBackend, 4> {
        Tensor::random([1, 3, size, size], Distribution::Default, &Default::default())
    }

    #[test]
    fn test_forward_416_gives_13x13_grid() {
        let net = build(20);
        let out = net.forward(images(416));
        assert_eq!(out.dims(), [1, output_channels(5, 20), 13, 13]);
        assert_eq!(net.output_channels(), 125);
    }

    #[test]
    fn test_branches_agree_spatially_for_multiples_of_32() {
        let net = build(3);
        for size in [32, 64, 96, 160] {
            let (fine, coarse) = net.forward_branches(images(size));
            let [_, fc, fh, fw] = fine.dims();
            let [_, cc, ch, cw] = coarse.dims();
            assert_eq!((fh, fw), (ch, cw), "input {size}");
            assert_eq!((fh, fw), (size / 32, size / 32));
            assert_eq!(fc, PASSTHROUGH_CHANNELS * 4);
            assert_eq!(cc, 1024);
        }
    }

    #[test]
    fn test_non_square_input() {
        let net = build(2);
        let x = Tensor::random([2, 3, 64, 128], Distribution::Default, &Default::default());
        assert_eq!(net.forward(x).dims(), [2, output_channels(5, 2), 2, 4]);
    }

    #[test]
    fn test_conv_inventory() {
        let net = build(20);
        let weights = net.conv_weights();
        // 13 in layers1, 7 in layers2, then passthrough, fuse, head
        assert_eq!(weights.len(), 23);
        assert_eq!(weights[0].val().dims(), [32, 3, 3, 3]);
        assert_eq!(weights[12].val().dims(), [512, 256, 3, 3]);
        assert_eq!(weights[19].val().dims(), [1024, 1024, 3, 3]);
        assert_eq!(weights[20].val().dims(), [64, 512, 1, 1]);
        assert_eq!(weights[21].val().dims(), [1024, 1280, 3, 3]);
        assert_eq!(weights[22].val().dims(), [125, 1024, 1, 1]);
    }

    #[test]
    fn test_passthrough_is_normalized_and_head_is_linear() {
        let net = build(20);

        assert!(net.passthrough.bn.is_some());
        assert!(net.passthrough.activate);
        assert!(net.passthrough.conv.bias.is_none());

        assert!(net.fuse.bn.is_some());
        assert!(net.fuse.activate);

        assert!(net.head.bn.is_none());
        assert!(!net.head.activate);
        assert!(net.head.conv.bias.is_some());
    }

    #[test]
    fn test_conv_weights_are_finite_and_not_constant() {
        let net = build(20);
        for (i, weight) in net.conv_weights().into_iter().enumerate() {
            let values = weight.val().into_data().to_vec::<f32>().unwrap();
            assert!(values.iter().all(|v| v.is_finite()), "conv {i} has non-finite weights");
            let first = values[0];
            assert!(values.iter().any(|v| *v != first), "conv {i} is constant");
        }
    }

    #[test]
    fn test_channel_bookkeeping_follows_stride() {
        let net: Darknet<TestBackend> = DarknetConfig::new(Anchor::voc(), 1)
            .with_stride(4)
            .init(&Default::default());
        // fuse input = 1024 + 64 * 4 * 4
        assert_eq!(net.fuse.conv.weight.val().dims()[1], 2048);
    }
}
