// ============================================================
// Layer 5 - Reorg (space-to-depth)
// ============================================================
// Folds each sh x sw block of pixels into channel depth:
//
//   [B, C, H, W]  →  [B, C·sh·sw, H/sh, W/sw]
//
// Phase (i, j) of the stride grid (row offset i, column offset j)
// becomes the channel block starting at (i·sw + j)·C:
//
//   out[b, (i·sw + j)·C + c, y, x] = in[b, c, y·sh + i, x·sw + j]
//
// so after reorg the fine passthrough map lines up pixel-for-pixel
// with the coarse stride-32 map and the two can be concatenated.
//
// Done as three reshape + swap passes:
//
//   [B, C, H', sh, W', sw]   swap(3, 4) → [B, C, H', W', sh, sw]
//   [B, C, H'·W', sh·sw]     swap(2, 3) → [B, C, sh·sw, H'·W']
//   [B, C, sh·sw, H', W']    swap(1, 2) → [B, sh·sw, C, H', W']
//   [B, sh·sw·C, H', W']
//
// Reference: Redmon & Farhadi (2017) §2 "Fine-Grained Features"

use burn::prelude::*;

/// Space-to-depth by `(stride_h, stride_w)`.
///
/// H and W must be divisible by their strides; burn panics on the
/// reshape otherwise.
pub fn reorg<B: Backend>(x: Tensor<B, 4>, stride_h: usize, stride_w: usize) -> Tensor<B, 4> {
    let [batch, channels, height, width] = x.dims();
    let (h, w) = (height / stride_h, width / stride_w);

    let x = x
        .reshape([batch, channels, h, stride_h, w, stride_w])
        .swap_dims(3, 4);
    let x = x
        .reshape([batch, channels, h * w, stride_h * stride_w])
        .swap_dims(2, 3);
    let x = x
        .reshape([batch, channels, stride_h * stride_w, h, w])
        .swap_dims(1, 2);
    x.reshape([batch, channels * stride_h * stride_w, h, w])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn values(x: Tensor<TestBackend, 4>) -> Vec<f32> {
        x.into_data().to_vec::<f32>().unwrap()
    }

    fn arange(dims: [usize; 4]) -> Tensor<TestBackend, 4> {
        let device = Default::default();
        let n = dims.iter().product::<usize>() as i64;
        Tensor::<TestBackend, 1, Int>::arange(0..n, &device)
            .float()
            .reshape(dims)
    }

    /// Straight index arithmetic, one element at a time.
    fn reorg_by_hand(input: &[f32], dims: [usize; 4], sh: usize, sw: usize) -> Vec<f32> {
        let [b, c, h, w] = dims;
        let (oh, ow) = (h / sh, w / sw);
        let oc = c * sh * sw;
        let mut out = vec![0.0; input.len()];
        for bi in 0..b {
            for ci in 0..c {
                for y in 0..h {
                    for x in 0..w {
                        let (i, j) = (y % sh, x % sw);
                        let ch = (i * sw + j) * c + ci;
                        let dst = ((bi * oc + ch) * oh + y / sh) * ow + x / sw;
                        let src = ((bi * c + ci) * h + y) * w + x;
                        out[dst] = input[src];
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_output_shape() {
        let out = reorg(arange([2, 3, 8, 12]), 2, 2);
        assert_eq!(out.dims(), [2, 12, 4, 6]);

        let out = reorg(arange([1, 64, 26, 26]), 2, 2);
        assert_eq!(out.dims(), [1, 256, 13, 13]);
    }

    #[test]
    fn test_literal_4x2x2_input() {
        // arange(16) as 1x4x2x2: channel c holds [4c, 4c+1, 4c+2, 4c+3]
        let out = reorg(arange([1, 4, 2, 2]), 2, 2);
        assert_eq!(out.dims(), [1, 16, 1, 1]);
        assert_eq!(
            values(out),
            vec![
                0.0, 4.0, 8.0, 12.0,
                1.0, 5.0, 9.0, 13.0,
                2.0, 6.0, 10.0, 14.0,
                3.0, 7.0, 11.0, 15.0,
            ]
        );
    }

    #[test]
    fn test_matches_index_arithmetic() {
        let dims = [2, 3, 6, 6];
        let input = arange(dims);
        let expected = reorg_by_hand(&values(input.clone()), dims, 2, 3);
        let out = reorg(input, 2, 3);
        assert_eq!(out.dims(), [2, 18, 3, 2]);
        assert_eq!(values(out), expected);
    }

    #[test]
    fn test_is_a_bijection_on_elements() {
        let device = Default::default();
        for (dims, sh, sw) in [([1, 2, 4, 4], 2, 2), ([3, 5, 6, 9], 3, 3), ([2, 1, 8, 4], 4, 2)] {
            let input = Tensor::<TestBackend, 4>::random(dims, Distribution::Default, &device);
            let mut before = values(input.clone());
            let mut after = values(reorg(input, sh, sw));
            assert_eq!(before.len(), after.len());
            before.sort_by(|a, b| a.partial_cmp(b).unwrap());
            after.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_inverse_regrouping_recovers_input() {
        let dims = [1, 3, 4, 6];
        let input = arange(dims);
        let original = values(input.clone());
        let out = values(reorg(input, 2, 2));

        // Walk the forward mapping backwards
        let [_, c, h, w] = dims;
        let (oh, ow) = (h / 2, w / 2);
        let mut restored = vec![f32::NAN; original.len()];
        for ch in 0..c * 4 {
            let (phase, ci) = (ch / c, ch % c);
            let (i, j) = (phase / 2, phase % 2);
            for y in 0..oh {
                for x in 0..ow {
                    let src = (ch * oh + y) * ow + x;
                    let dst = (ci * h + y * 2 + i) * w + x * 2 + j;
                    restored[dst] = out[src];
                }
            }
        }
        assert_eq!(restored, original);
    }

    #[test]
    fn test_stride_one_is_identity() {
        let input = arange([1, 2, 3, 3]);
        let original = values(input.clone());
        assert_eq!(values(reorg(input, 1, 1)), original);
    }
}
