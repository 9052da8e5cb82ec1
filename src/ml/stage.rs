// ============================================================
// Layer 5 - Convolution Stages
// ============================================================
// A stage is a run of conv blocks with an optional 2x2 / stride-2
// max-pool before or after it. Backbones are lists of stages:
//
//   Darknet layers1:  [conv, pool] [conv, pool] [3 convs, pool] ...
//   Darknet layers2:  [pool, 5 convs]
//   Tiny:             [conv, pool] x 5
//
// Pooling halves H and W and floors odd sizes, so inputs must be
// multiples of the backbone's total stride.

use burn::{
    module::Param,
    nn::pool::{MaxPool2d, MaxPool2dConfig},
    prelude::*,
};

use crate::ml::conv::ConvBlock;
use crate::ml::init::ConvParams;

/// 2x2 max-pool with stride 2 (burn's pooling stride defaults to 1)
pub fn halving_pool() -> MaxPool2d {
    MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init()
}

#[derive(Module, Debug)]
pub struct ConvStage<B: Backend> {
    pub pre_pool:  Option<MaxPool2d>,
    pub convs:     Vec<ConvBlock<B>>,
    pub post_pool: Option<MaxPool2d>,
}

impl<B: Backend> ConvStage<B> {
    /// Convs followed by a halving pool
    pub fn pooled(convs: Vec<ConvBlock<B>>) -> Self {
        Self { pre_pool: None, convs, post_pool: Some(halving_pool()) }
    }

    /// A halving pool followed by convs
    pub fn pool_first(convs: Vec<ConvBlock<B>>) -> Self {
        Self { pre_pool: Some(halving_pool()), convs, post_pool: None }
    }

    /// Convs only
    pub fn plain(convs: Vec<ConvBlock<B>>) -> Self {
        Self { pre_pool: None, convs, post_pool: None }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = match &self.pre_pool {
            Some(pool) => pool.forward(x),
            None       => x,
        };
        for conv in &self.convs {
            x = conv.forward(x);
        }
        match &self.post_pool {
            Some(pool) => pool.forward(x),
            None       => x,
        }
    }
}

/// Run `x` through every stage in order
pub fn forward_stages<B: Backend>(stages: &[ConvStage<B>], x: Tensor<B, 4>) -> Tensor<B, 4> {
    stages.iter().fold(x, |x, stage| stage.forward(x))
}

impl<B: Backend> ConvParams<B> for ConvBlock<B> {
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>> {
        vec![&self.conv.weight]
    }

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>> {
        vec![&mut self.conv.weight]
    }
}

impl<B: Backend> ConvParams<B> for ConvStage<B> {
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>> {
        self.convs.conv_weights()
    }

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>> {
        self.convs.conv_weights_mut()
    }
}

impl<B: Backend, T: ConvParams<B>> ConvParams<B> for Vec<T> {
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>> {
        self.iter().flat_map(|m| m.conv_weights()).collect()
    }

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>> {
        self.iter_mut().flat_map(|m| m.conv_weights_mut()).collect()
    }
}
