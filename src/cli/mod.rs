// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and delegates to Layer 2.
//
//   prepare  — download raw data if missing
//   split    — build (and by default persist) the splits
//   inspect  — restore persisted splits and summarise them
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, CommonArgs, InspectArgs, SplitArgs};

use crate::application::{
    inspect_use_case::{InspectReport, InspectUseCase},
    split_use_case::SplitUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "visionpod-data",
    version,
    about = "Download an image dataset, split it into train/val/test and persist the splits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Only routes and prints.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Split(args) => run_split(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_prepare(args: CommonArgs) -> Result<()> {
    let config = args.resolve()?;
    let data_dir = config.data_dir.clone();

    let state = SplitUseCase::new(config).prepare()?;
    println!("Data ready in '{}' ({:?})", data_dir.display(), state);
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let config = args.common.resolve()?;
    tracing::info!("Splitting {:?} (stage: {})", config.provider, args.stage);

    let report = SplitUseCase::new(config).execute(args.stage, !args.no_persist)?;

    println!("Provider: {}", report.provider);
    for (name, len) in [
        ("train", report.train_len),
        ("val", report.val_len),
        ("test", report.test_len),
    ] {
        if let Some(len) = len {
            println!("  {name:<5} {len:>7} samples");
        }
    }
    for path in &report.written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let report = InspectUseCase::from_saved(&args.config)?.execute()?;
    print_inspect(&report);
    Ok(())
}

fn print_inspect(report: &InspectReport) {
    println!("Provider: {}", report.provider);
    for p in &report.partitions {
        let shape = p
            .first_batch
            .map(|[rows, cols]| format!("[{rows}, {cols}]"))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<5} {:>7} samples  {:>5} batches  first batch {}  ({})",
            p.kind.to_string(),
            p.samples,
            p.batches,
            shape,
            p.snapshot.display()
        );
        let labels: Vec<String> = p
            .label_counts
            .iter()
            .map(|(label, count)| format!("{label}:{count}"))
            .collect();
        println!("        labels {}", labels.join(" "));
    }
    for kind in &report.missing {
        println!("  {:<5} no snapshot", kind.to_string());
    }
    match report.train_val_disjoint {
        Some(true) => println!("train and val are disjoint"),
        Some(false) => println!("WARNING: train and val overlap"),
        None => {}
    }
}
