//! Command-line interface of the Twins testcase generator. It validates the arguments,
//! configures logging and runs this machine's share of the corpus generation.
use anyhow::Context as _;
use clap::Parser;
use std::{io::IsTerminal as _, path::PathBuf};
use tracing::metadata::LevelFilter;
use twins_generator::{Config, Generator, RunConfig};

/// Command line arguments.
#[derive(Debug, Parser)]
struct Args {
    /// The number of nodes.
    #[arg(long)]
    nodes: usize,
    /// The number of partitions per round.
    #[arg(long)]
    partitions: usize,
    /// The number of rounds per testcase.
    #[arg(long)]
    rounds: usize,
    /// Maximum number of testcases to print in a single file.
    #[arg(long, default_value_t = 100)]
    testcases_per_file: usize,
    /// Directory where the testcase files are created.
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// The 1-based index of this machine.
    #[arg(long, default_value_t = 1)]
    index: usize,
    /// The total number of machines generating the corpus.
    #[arg(long, default_value_t = 1)]
    machines: usize,
    /// The number of worker threads.
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Write to a scratch directory which is discarded afterwards.
    #[arg(long)]
    dry_run: bool,
    /// Activate verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal())
        .init();

    let config =
        Config::new(args.nodes, args.partitions, args.rounds).context("invalid configuration")?;
    let run = RunConfig {
        testcases_per_file: args.testcases_per_file,
        out_dir: args.path,
        machine_index: args.index,
        num_machines: args.machines,
        workers: args.workers,
        dry_run: args.dry_run,
    };
    Generator::new(config, run)
        .context("invalid run configuration")?
        .run()
        .context("generation failed")
}
