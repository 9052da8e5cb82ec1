// ============================================================
// Layer 5 - Tiny YOLOv2
// ============================================================
// One straight stack, no passthrough:
//
//   [conv 3x3, pool 2/2] x 5      16 → 256 channels, stride 32
//   conv 3x3                      512
//   pad bottom/right, pool 2/1    keeps the grid size
//   conv 3x3 x 2                  1024
//   conv 1x1 (linear)             output_channels
//
// The sixth pool is stride 1, so without extra padding a 13x13
// map would come out 12x12. One row and one column of f32::MIN
// are added on the bottom and right edges; they can never win a
// max, so the edge cells pool over their real neighbours only.
//
// Reference: Darknet cfg/yolov2-tiny-voc.cfg

use burn::{
    module::Param,
    nn::pool::{MaxPool2d, MaxPool2dConfig},
    prelude::*,
};

use crate::domain::anchor::Anchor;
use crate::domain::prediction::output_channels;
use crate::ml::conv::{ConvBlock, ConvBlockConfig};
use crate::ml::detector::Detector;
use crate::ml::init::{xavier_normal_pass, ConvParams};
use crate::ml::stage::{forward_stages, ConvStage};

/// Stride-1 2x2 max-pool that keeps H and W.
#[derive(Module, Debug, Clone)]
pub struct SamePool2d {
    pool: MaxPool2d,
}

impl SamePool2d {
    pub fn new() -> Self {
        Self { pool: MaxPool2dConfig::new([2, 2]).with_strides([1, 1]).init() }
    }

    pub fn forward<B: Backend>(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.pool.forward(pad_bottom_right(x, f32::MIN))
    }
}

impl Default for SamePool2d {
    fn default() -> Self {
        Self::new()
    }
}

/// Append one row below and one column to the right filled with `value`.
pub fn pad_bottom_right<B: Backend>(x: Tensor<B, 4>, value: f32) -> Tensor<B, 4> {
    let [batch, channels, height, width] = x.dims();
    let device = x.device();
    let row = Tensor::full([batch, channels, 1, width], value, &device);
    let x = Tensor::cat(vec![x, row], 2);
    let column = Tensor::full([batch, channels, height + 1, 1], value, &device);
    Tensor::cat(vec![x, column], 3)
}

#[derive(Config, Debug)]
pub struct TinyConfig {
    pub anchors:     Vec<Anchor>,
    pub num_classes: usize,
}

impl TinyConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Tiny<B> {
        let conv3 = |i: usize, o: usize| ConvBlockConfig::batch_norm(i, o, 3).init::<B>(device);

        let mut channels_in = 3;
        let mut channels_out = 16;

        let mut blocks = Vec::new();
        for _ in 0..5 {
            blocks.push(ConvStage::pooled(vec![conv3(channels_in, channels_out)]));
            channels_in = channels_out;
            channels_out *= 2;
        }
        let conv6 = conv3(channels_in, channels_out);
        channels_in = channels_out;
        channels_out *= 2;

        let mut convs = Vec::new();
        for _ in 0..2 {
            convs.push(conv3(channels_in, channels_out));
            channels_in = channels_out;
        }
        let head = ConvBlockConfig::linear(channels_in, output_channels(self.anchors.len(), self.num_classes), 1)
            .init(device);

        xavier_normal_pass(Tiny {
            blocks,
            conv6,
            same_pool: SamePool2d::new(),
            convs,
            head,
        })
    }
}

#[derive(Module, Debug)]
pub struct Tiny<B: Backend> {
    pub blocks:    Vec<ConvStage<B>>,
    pub conv6:     ConvBlock<B>,
    pub same_pool: SamePool2d,
    pub convs:     Vec<ConvBlock<B>>,
    pub head:      ConvBlock<B>,
}

impl<B: Backend> Detector<B> for Tiny<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = forward_stages(&self.blocks, images);
        let x = self.same_pool.forward(self.conv6.forward(x));
        let x = self.convs.iter().fold(x, |x, conv| conv.forward(x));
        self.head.forward(x)
    }

    fn output_channels(&self) -> usize {
        self.head.out_channels()
    }
}

impl<B: Backend> ConvParams<B> for Tiny<B> {
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>> {
        let mut weights = self.blocks.conv_weights();
        weights.extend(self.conv6.conv_weights());
        weights.extend(self.convs.conv_weights());
        weights.extend(self.head.conv_weights());
        weights
    }

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>> {
        let mut weights = self.blocks.conv_weights_mut();
        weights.extend(self.conv6.conv_weights_mut());
        weights.extend(self.convs.conv_weights_mut());
        weights.extend(self.head.conv_weights_mut());
        weights
    }
}
