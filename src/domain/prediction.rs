// ============================================================
// Layer 3 - Prediction Layout
// ============================================================
// The detection head emits one vector per anchor per grid cell.
// Each vector is laid out as:
//
//   [ tx, ty, tw, th, objectness, class_0, ..., class_{n-1} ]
//     └──── box ────┘  └── 1 ──┘  └──────── n ────────┘
//
// and the vectors of all anchors are stacked along the channel
// axis, so the head produces num_anchors * (5 + num_classes)
// channels. Decoding these numbers into boxes is NOT done here.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Number of box regression values per anchor (tx, ty, tw, th)
pub const BOX_VALUES: usize = 4;

/// One objectness score per anchor
pub const OBJECTNESS_VALUES: usize = 1;

/// Number of output channels per grid cell.
pub fn output_channels(num_anchors: usize, num_classes: usize) -> usize {
    num_anchors * (BOX_VALUES + OBJECTNESS_VALUES + num_classes)
}

/// `output_channels`, or `None` when the count does not fit in a `usize`.
pub fn checked_output_channels(num_anchors: usize, num_classes: usize) -> Option<usize> {
    (BOX_VALUES + OBJECTNESS_VALUES)
        .checked_add(num_classes)?
        .checked_mul(num_anchors)
}

/// Channel layout of the detection head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionLayout {
    pub num_anchors: usize,
    pub num_classes: usize,
}

impl PredictionLayout {
    pub fn new(num_anchors: usize, num_classes: usize) -> Self {
        Self { num_anchors, num_classes }
    }

    /// Length of the prediction vector for a single anchor
    pub fn per_anchor(&self) -> usize {
        BOX_VALUES + OBJECTNESS_VALUES + self.num_classes
    }

    pub fn channels(&self) -> usize {
        output_channels(self.num_anchors, self.num_classes)
    }

    /// Channel range holding the whole vector of `anchor`.
    pub fn anchor_range(&self, anchor: usize) -> Range<usize> {
        let start = anchor * self.per_anchor();
        start..start + self.per_anchor()
    }

    /// Channel range of the box offsets of `anchor`
    pub fn box_range(&self, anchor: usize) -> Range<usize> {
        let start = self.anchor_range(anchor).start;
        start..start + BOX_VALUES
    }

    /// Channel index of the objectness score of `anchor`
    pub fn objectness_channel(&self, anchor: usize) -> usize {
        self.anchor_range(anchor).start + BOX_VALUES
    }

    /// Channel range of the class scores of `anchor`
    pub fn class_range(&self, anchor: usize) -> Range<usize> {
        let start = self.objectness_channel(anchor) + OBJECTNESS_VALUES;
        start..start + self.num_classes
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voc_output_channels() {
        // 5 anchors, 20 classes → 5 * 25
        assert_eq!(output_channels(5, 20), 125);
        assert_eq!(output_channels(5, 80), 425);
        assert_eq!(checked_output_channels(5, 80), Some(425));
    }

    #[test]
    fn test_layout_ranges_tile_the_channels() {
        let layout = PredictionLayout::new(3, 2);
        assert_eq!(layout.channels(), 21);

        let mut covered = Vec::new();
        for a in 0..layout.num_anchors {
            covered.extend(layout.box_range(a));
            covered.push(layout.objectness_channel(a));
            covered.extend(layout.class_range(a));
        }
        let expected: Vec<usize> = (0..layout.channels()).collect();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_second_anchor_offsets() {
        let layout = PredictionLayout::new(5, 20);
        assert_eq!(layout.anchor_range(1), 25..50);
        assert_eq!(layout.box_range(1), 25..29);
        assert_eq!(layout.objectness_channel(1), 29);
        assert_eq!(layout.class_range(1), 30..50);
    }

    #[test]
    fn test_checked_output_channels_reports_overflow() {
        assert_eq!(checked_output_channels(1, usize::MAX), None);
        assert_eq!(checked_output_channels(5, usize::MAX / 4), None);
    }
}
