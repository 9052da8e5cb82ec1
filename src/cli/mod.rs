// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. This is the only layer that prints.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ForwardArgs, InitConfigArgs, ModelArgs};

use crate::application::spec_source::SpecSource;

/// Top-level parser. clap derives the argument handling from
/// the fields, so adding a subcommand only touches `Commands`.
#[derive(Parser, Debug)]
#[command(
    name = "yolo2",
    version,
    about = "Build YOLOv2 (Darknet-19) and Tiny YOLOv2 detection networks, inspect them and run them."
)]
pub struct Cli {
    /// The subcommand to run (summary, forward or init-config)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the handler of the parsed subcommand.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Summary(args)    => run_summary(args),
            Commands::Forward(args)    => run_forward(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

/// Handles `summary`: resolve the spec, build the network on the
/// CPU and print its conv table.
fn run_summary(args: ModelArgs) -> Result<()> {
    use crate::application::summary_use_case::SummaryUseCase;

    // Flags (or --config) → validated ModelSpec
    let spec = SpecSource::from(args).resolve()?;
    let summary = SummaryUseCase::new(spec).execute()?;
    println!("{summary}");
    Ok(())
}

/// Handles `forward`: push one random batch through the network
/// on the chosen backend and report the shapes.
fn run_forward(args: ForwardArgs) -> Result<()> {
    use crate::application::forward_use_case::ForwardUseCase;

    let spec = SpecSource::from(args.model).resolve()?;
    let use_case = ForwardUseCase::new(spec, args.batch_size, args.backend.into());
    let report = use_case.execute()?;

    // The grid is the last two output dims
    let (gh, gw) = report.grid();
    println!("input:   {:?}", report.input_dims);
    println!("output:  {:?}", report.output_dims);
    println!("grid:    {gh}x{gw}");
    println!("elapsed: {:.1?}", report.elapsed);
    Ok(())
}

/// Handles `init-config`: write the resolved spec as JSON so it
/// can be edited and passed back with `--config`.
fn run_init_config(args: InitConfigArgs) -> Result<()> {
    use crate::infra::config_store::ConfigStore;

    // Resolving first means an invalid spec is never written
    let spec = SpecSource::from(args.model).resolve()?;
    let store = ConfigStore::new(args.output);
    store.save(&spec)?;
    println!("Wrote {} spec to {}", spec.architecture, store.path().display());
    Ok(())
}
