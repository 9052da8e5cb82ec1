// ============================================================
// Layer 5 - Weight Initialisation
// ============================================================
// After a network is assembled, every convolution weight is
// re-drawn from a Xavier (Glorot) normal distribution:
//
//   w ~ N(0, std²),  std = gain · sqrt(2 / (fan_in + fan_out))
//
// with fan_in = in · kh · kw and fan_out = out · kh · kw.
//
// Networks list their conv weights explicitly through the
// ConvParams trait; there is no type-based module scan.
//
// Reference: Glorot & Bengio (2010) Understanding the difficulty
//            of training deep feedforward neural networks

use burn::{module::Param, nn::Initializer, prelude::*};

/// Explicit handles to every convolution weight of a network.
pub trait ConvParams<B: Backend> {
    /// Every conv weight, in construction order
    fn conv_weights(&self) -> Vec<&Param<Tensor<B, 4>>>;

    fn conv_weights_mut(&mut self) -> Vec<&mut Param<Tensor<B, 4>>>;
}

/// Fan-in and fan-out of a `[out, in, kh, kw]` conv weight.
pub fn conv_fans(dims: [usize; 4]) -> (usize, usize) {
    let [out_channels, in_channels, kh, kw] = dims;
    let receptive = kh * kw;
    (in_channels * receptive, out_channels * receptive)
}

/// Replace one conv weight with a Xavier-normal sample of the same shape.
pub fn xavier_normal<B: Backend>(weight: &mut Param<Tensor<B, 4>>, gain: f64) {
    let current = weight.val();
    let dims = current.dims();
    let (fan_in, fan_out) = conv_fans(dims);
    *weight = Initializer::XavierNormal { gain }.init_with(
        dims,
        Some(fan_in),
        Some(fan_out),
        &current.device(),
    );
}

/// Re-draw every conv weight of `model` (gain 1).
pub fn xavier_normal_pass<B: Backend, M: ConvParams<B>>(mut model: M) -> M {
    for weight in model.conv_weights_mut() {
        xavier_normal(weight, 1.0);
    }
    model
}
