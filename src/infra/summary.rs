// ============================================================
// Layer 6 - Network Summary
// ============================================================
// A printable inventory of a built network: one row per
// convolution (in construction order), the parameter count and
// the shape of the prediction grid.
//
// Example (Tiny, 20 classes, 416 input):
//
//   #    out    in  kernel
//   0     16     3  3x3
//   ...
//   8    125  1024  1x1
//   parameters: 15,861,773
//   per anchor: box 0..4, objectness 4, classes 5..25 (x5 anchors)
//   output:     125 x 13 x 13

use serde::{Deserialize, Serialize};
use std::fmt;

use burn::prelude::*;

use crate::domain::model_spec::ModelSpec;
use crate::domain::prediction::PredictionLayout;
use crate::ml::detector::Detector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvRow {
    pub index:        usize,
    pub out_channels: usize,
    pub in_channels:  usize,
    pub kernel:       [usize; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub architecture:    String,
    pub convs:           Vec<ConvRow>,
    pub num_params:      usize,
    pub output_channels: usize,
    pub grid_size:       usize,
    pub layout:          PredictionLayout,
}

impl NetworkSummary {
    pub fn from_detector<B: Backend, D: Detector<B>>(spec: &ModelSpec, model: &D) -> Self {
        let convs = model
            .conv_weights()
            .into_iter()
            .enumerate()
            .map(|(index, weight)| {
                let [out_channels, in_channels, kh, kw] = weight.val().dims();
                ConvRow { index, out_channels, in_channels, kernel: [kh, kw] }
            })
            .collect();

        Self {
            architecture:    spec.architecture.to_string(),
            convs,
            num_params:      model.num_params(),
            output_channels: model.output_channels(),
            grid_size:       spec.input_size / model.downsample_factor(),
            layout:          spec.layout(),
        }
    }
}

/// 1234567 → "1,234,567"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} convolutions)", self.architecture, self.convs.len())?;
        writeln!(f, "{:>3} {:>6} {:>6}  kernel", "#", "out", "in")?;
        for row in &self.convs {
            writeln!(
                f,
                "{:>3} {:>6} {:>6}  {}x{}",
                row.index, row.out_channels, row.in_channels, row.kernel[0], row.kernel[1]
            )?;
        }
        writeln!(f, "parameters: {}", group_thousands(self.num_params))?;
        let layout = &self.layout;
        let (boxes, classes) = (layout.box_range(0), layout.class_range(0));
        writeln!(
            f,
            "per anchor: box {}..{}, objectness {}, classes {}..{} (x{} anchors)",
            boxes.start, boxes.end, layout.objectness_channel(0), classes.start, classes.end, layout.num_anchors
        )?;
        write!(
            f,
            "output:     {} x {} x {}",
            self.output_channels, self.grid_size, self.grid_size
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model_spec::Architecture;
    use crate::ml::tiny::TinyConfig;
    use burn::backend::NdArray;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(15867885), "15,867,885");
    }

    #[test]
    fn test_tiny_summary() {
        let spec = ModelSpec { architecture: Architecture::Tiny, ..ModelSpec::default() };
        let model = TinyConfig::new(spec.anchors.clone(), spec.num_classes)
            .init::<NdArray>(&Default::default());
        let summary = NetworkSummary::from_detector(&spec, &model);

        assert_eq!(summary.convs.len(), 9);
        assert_eq!(summary.convs[0], ConvRow { index: 0, out_channels: 16, in_channels: 3, kernel: [3, 3] });
        assert_eq!(summary.output_channels, 125);
        assert_eq!(summary.grid_size, 13);

        // conv weights + BN (gamma, beta, running mean/var) + head bias
        let conv: usize = summary
            .convs
            .iter()
            .map(|r| r.out_channels * r.in_channels * r.kernel[0] * r.kernel[1])
            .sum();
        let bn: usize = summary.convs[..8].iter().map(|r| 4 * r.out_channels).sum();
        assert!(summary.num_params >= conv + 125);
        assert!(summary.num_params <= conv + bn + 125);

        let text = summary.to_string();
        assert!(text.starts_with("tiny (9 convolutions)"));
        assert!(text.contains("per anchor: box 0..4, objectness 4, classes 5..25 (x5 anchors)"));
        assert!(text.ends_with("output:     125 x 13 x 13"));
    }
}
