// ============================================================
// Layer 3 - Model Specification
// ============================================================
// Everything needed to rebuild a detector: which backbone, how
// many classes, which anchors, the reorg stride and the input
// resolution the network is meant to run at.
//
// Serialisable so it can be written to / read from JSON by the
// infra layer and handed across the CLI → application boundary.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::anchor::Anchor;
use crate::domain::prediction::{checked_output_channels, PredictionLayout};

/// The two supported backbones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// Darknet-19 with the passthrough / reorg branch
    Darknet,
    /// Nine-layer Tiny YOLOv2
    Tiny,
}

impl Architecture {
    /// Total spatial downsampling between input and output grid.
    /// Both backbones use five stride-2 poolings.
    pub fn downsample_factor(&self) -> usize {
        match self {
            Architecture::Darknet => 32,
            Architecture::Tiny    => 32,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Darknet => write!(f, "darknet"),
            Architecture::Tiny    => write!(f, "tiny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub architecture: Architecture,
    pub num_classes:  usize,
    pub anchors:      Vec<Anchor>,
    /// Reorg stride of the Darknet passthrough branch (ignored by Tiny)
    #[serde(default = "default_stride")]
    pub stride:       usize,
    #[serde(default = "default_input_size")]
    pub input_size:   usize,
}

fn default_stride() -> usize { 2 }

fn default_input_size() -> usize { 416 }

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            architecture: Architecture::Darknet,
            num_classes:  20,
            anchors:      Anchor::voc(),
            stride:       default_stride(),
            input_size:   default_input_size(),
        }
    }
}

impl ModelSpec {
    pub fn layout(&self) -> PredictionLayout {
        PredictionLayout::new(self.anchors.len(), self.num_classes)
    }

    /// Side length of the output grid for the configured input size
    pub fn grid_size(&self) -> usize {
        self.input_size / self.architecture.downsample_factor()
    }

    /// Reject specs that would build a network with no output
    /// channels or an input the backbone cannot divide evenly.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.anchors.is_empty(), "at least one anchor is required");
        ensure!(self.num_classes > 0, "num_classes must be positive");
        ensure!(
            self.anchors.iter().all(Anchor::is_valid),
            "anchor sizes must be positive and finite"
        );
        ensure!(
            checked_output_channels(self.anchors.len(), self.num_classes).is_some(),
            "{} anchors x {} classes overflows the output channel count",
            self.anchors.len(), self.num_classes
        );
        check_input_size(self.architecture, self.input_size, self.input_size)?;
        if self.architecture == Architecture::Darknet {
            ensure!(self.stride > 0, "reorg stride must be positive");
            // The passthrough map (stride 16) must shrink onto the
            // stride-32 grid after reorg.
            let passthrough = self.input_size / 16;
            ensure!(
                passthrough % self.stride == 0 && passthrough / self.stride == self.grid_size(),
                "reorg stride {} does not map the {}x{} passthrough onto the {}x{} grid",
                self.stride, passthrough, passthrough, self.grid_size(), self.grid_size()
            );
        }
        Ok(())
    }
}

/// Input height and width must be non-zero multiples of the
/// backbone's downsampling factor.
pub fn check_input_size(architecture: Architecture, height: usize, width: usize) -> Result<()> {
    let factor = architecture.downsample_factor();
    ensure!(
        height > 0 && width > 0 && height % factor == 0 && width % factor == 0,
        "{} input {}x{} is not a multiple of {}",
        architecture, height, width, factor
    );
    Ok(())
}
