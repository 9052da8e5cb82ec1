// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Three subcommands:
//
//   summary      - list the convolutions and parameter count
//   forward      - run a random batch through the network
//   init-config  - write a model spec JSON to edit and reuse
//
// Every command takes the same model flags (ModelArgs); passing
// --config replaces all of them with the contents of a spec file.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::forward_use_case::ComputeBackend;
use crate::application::spec_source::SpecSource;
use crate::domain::model_spec::Architecture;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the layer inventory of a network
    Summary(ModelArgs),

    /// Run a random image batch through a network
    Forward(ForwardArgs),

    /// Write a model spec JSON file
    InitConfig(InitConfigArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModelKind {
    /// Darknet-19 YOLOv2 with the passthrough branch
    Darknet,
    /// Tiny YOLOv2
    Tiny,
}

impl From<ModelKind> for Architecture {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Darknet => Architecture::Darknet,
            ModelKind::Tiny    => Architecture::Tiny,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendKind {
    /// CPU
    Ndarray,
    /// GPU via wgpu
    Wgpu,
}

impl From<BackendKind> for ComputeBackend {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Ndarray => ComputeBackend::Ndarray,
            BackendKind::Wgpu    => ComputeBackend::Wgpu,
        }
    }
}

/// Flags describing which network to build
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Model spec JSON; overrides every other model flag
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backbone to build
    #[arg(long, value_enum, default_value_t = ModelKind::Darknet)]
    pub model: ModelKind,

    /// Number of object classes
    #[arg(long, default_value_t = 20)]
    pub num_classes: usize,

    /// Anchor file, one "width height" pair per line
    /// (defaults to the five VOC anchors)
    #[arg(long)]
    pub anchors: Option<PathBuf>,

    /// Reorg stride of the Darknet passthrough branch
    #[arg(long, default_value_t = 2)]
    pub stride: usize,

    /// Square input resolution, a multiple of 32
    #[arg(long, default_value_t = 416)]
    pub input_size: usize,
}

/// The boundary between Layer 1 and Layer 2: the application
/// layer never sees clap types.
impl From<ModelArgs> for SpecSource {
    fn from(a: ModelArgs) -> Self {
        match a.config {
            Some(path) => SpecSource::File(path),
            None => SpecSource::Settings {
                architecture: a.model.into(),
                num_classes:  a.num_classes,
                anchors_file: a.anchors,
                stride:       a.stride,
                input_size:   a.input_size,
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Images per batch
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Device to run on
    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the model spec JSON
    #[arg(long, default_value = "model.json")]
    pub output: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}
