// ============================================================
// Layer 3 - Anchor Domain Type
// ============================================================
// An anchor is a prior box shape. Every grid cell predicts one
// box per anchor, expressed as offsets relative to that prior,
// so the NUMBER of anchors fixes the width of the output tensor.
//
// Widths and heights are measured in grid cells (1.0 = one cell
// of the final 13x13 grid for a 416x416 input).
//
// Reference: Redmon & Farhadi (2017) §2 "Dimension Clusters"

use serde::{Deserialize, Serialize};

/// A prior box shape in grid-cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub width:  f32,
    pub height: f32,
}

impl Anchor {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides must be strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The five k-means anchors YOLOv2 ships for PASCAL VOC.
    pub fn voc() -> Vec<Anchor> {
        vec![
            Anchor::new(1.3221,  1.73145),
            Anchor::new(3.19275, 4.00944),
            Anchor::new(5.05587, 8.09892),
            Anchor::new(9.47112, 4.84053),
            Anchor::new(11.2364, 10.0071),
        ]
    }
}
