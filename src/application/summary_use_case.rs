// ============================================================
// Layer 2 - SummaryUseCase
// ============================================================
// Builds the network described by a spec on the CPU backend and
// returns its inventory. Nothing is run through it.

use anyhow::Result;
use burn::backend::NdArray;

use crate::domain::model_spec::{Architecture, ModelSpec};
use crate::infra::summary::NetworkSummary;
use crate::ml::darknet::DarknetConfig;
use crate::ml::tiny::TinyConfig;

/// Builds a network only to describe it.
pub struct SummaryUseCase {
    /// Network to describe
    spec: ModelSpec,
}

impl SummaryUseCase {
    /// Create the use case. Validation is deferred to `execute`.
    pub fn new(spec: ModelSpec) -> Self {
        Self { spec }
    }

    /// Build the network on NdArray and collect its inventory.
    pub fn execute(&self) -> Result<NetworkSummary> {
        let spec = &self.spec;
        spec.validate()?;

        // Weights are Xavier-initialised but never used; the CPU is enough

        let device = Default::default();
        let summary = match spec.architecture {
            Architecture::Darknet => {
                let model = DarknetConfig::new(spec.anchors.clone(), spec.num_classes)
                    .with_stride(spec.stride)
                    .init::<NdArray>(&device);
                NetworkSummary::from_detector(spec, &model)
            }
            Architecture::Tiny => {
                let model = TinyConfig::new(spec.anchors.clone(), spec.num_classes)
                    .init::<NdArray>(&device);
                NetworkSummary::from_detector(spec, &model)
            }
        };

        tracing::info!(
            "Built {} with {} convolutions, {} parameters",
            summary.architecture, summary.convs.len(), summary.num_params
        );
        Ok(summary)
    }
}
