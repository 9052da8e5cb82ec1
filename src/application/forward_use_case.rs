// ============================================================
// Layer 2 - ForwardUseCase
// ============================================================
// Builds the network on the requested backend, pushes a batch of
// random images through it and reports what came out:
//
//   Step 1: Check the input size against the backbone stride
//   Step 2: Build the network (Xavier-initialised)
//   Step 3: Forward a [batch, 3, size, size] random batch
//   Step 4: Check the grid shape and that every value is finite
//
// Useful as a smoke test of a spec and of a device.

use anyhow::{ensure, Result};
use burn::{prelude::*, tensor::Distribution};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::domain::model_spec::{check_input_size, Architecture, ModelSpec};
use crate::ml::darknet::DarknetConfig;
use crate::ml::detector::Detector;
use crate::ml::tiny::TinyConfig;

/// Where the tensors live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeBackend {
    /// CPU, pure Rust
    Ndarray,
    /// GPU through wgpu
    Wgpu,
}

/// What a single forward pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardReport {
    /// [batch, 3, height, width] of the random input
    pub input_dims:  [usize; 4],
    /// [batch, output_channels, grid_h, grid_w]
    pub output_dims: [usize; 4],
    /// Wall time of the forward pass including the readback
    pub elapsed:     Duration,
}

impl ForwardReport {
    /// (rows, cols) of the prediction grid
    pub fn grid(&self) -> (usize, usize) {
        (self.output_dims[2], self.output_dims[3])
    }
}

/// Runs one random batch through a freshly built network.
pub struct ForwardUseCase {
    /// Network to build; input size is taken from here too
    spec:       ModelSpec,
    /// Number of images in the random batch
    batch_size: usize,
    backend:    ComputeBackend,
}

impl ForwardUseCase {
    pub fn new(spec: ModelSpec, batch_size: usize, backend: ComputeBackend) -> Self {
        Self { spec, batch_size, backend }
    }

    /// Pick the device, then hand off to the generic `run`.
    pub fn execute(&self) -> Result<ForwardReport> {
        // Step 1: reject bad settings before anything is allocated
        ensure!(self.batch_size > 0, "batch size must be positive");
        self.spec.validate()?;

        match self.backend {
            ComputeBackend::Ndarray => {
                let device = burn::backend::ndarray::NdArrayDevice::default();
                tracing::info!("Using NdArray device: {:?}", device);
                self.run::<burn::backend::NdArray>(&device)
            }
            ComputeBackend::Wgpu => {
                let device = burn::backend::wgpu::WgpuDevice::default();
                tracing::info!("Using WGPU device: {:?}", device);
                self.run::<burn::backend::Wgpu>(&device)
            }
        }
    }

    /// Step 2: build the network selected by the spec on backend `B`.
    fn run<B: Backend>(&self, device: &B::Device) -> Result<ForwardReport> {
        let spec = &self.spec;
        match spec.architecture {
            Architecture::Darknet => {
                let model: crate::ml::darknet::Darknet<B> =
                    DarknetConfig::new(spec.anchors.clone(), spec.num_classes)
                        .with_stride(spec.stride)
                        .init(device);
                self.forward_random(&model, device)
            }
            Architecture::Tiny => {
                let model: crate::ml::tiny::Tiny<B> =
                    TinyConfig::new(spec.anchors.clone(), spec.num_classes).init(device);
                self.forward_random(&model, device)
            }
        }
    }

    /// Steps 3 and 4: forward random images and check the result.
    fn forward_random<B: Backend, D: Detector<B>>(&self, model: &D, device: &B::Device) -> Result<ForwardReport> {
        let size = self.spec.input_size;
        check_input_size(self.spec.architecture, size, size)?;

        // RGB images, uniform in [0, 1)
        let input_dims = [self.batch_size, 3, size, size];
        let images = Tensor::<B, 4>::random(input_dims, Distribution::Default, device);

        let start = Instant::now();
        let output = model.forward(images);
        // Pull the values back to the host so lazy backends finish the work
        let values = output.clone().into_data().to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read output tensor: {e:?}"))?;
        let elapsed = start.elapsed();

        let output_dims = output.dims();
        let grid = size / model.downsample_factor();
        ensure!(
            output_dims == [self.batch_size, self.spec.layout().channels(), grid, grid],
            "unexpected output shape {:?}", output_dims
        );
        ensure!(values.iter().all(|v| v.is_finite()), "forward pass produced non-finite values");

        tracing::debug!("Forward {:?} → {:?} in {:?}", input_dims, output_dims, elapsed);
        Ok(ForwardReport { input_dims, output_dims, elapsed })
    }
}
