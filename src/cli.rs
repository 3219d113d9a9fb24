//! Command-line interface for the conformance runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "polyrt")]
#[command(about = "Conformance runner for the polyrt runtime", long_about = None)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `polyrt=trace` (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run conformance suites and report every case
    Run(RunArgs),
    /// List the suites and their cases without running them
    #[command(alias = "ls")]
    List(SuiteArgs),
}

#[derive(Args)]
pub struct SuiteArgs {
    /// Runner configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Additional suite file (repeatable)
    #[arg(long = "suite", short = 's')]
    pub suites: Vec<PathBuf>,

    /// Skip the built-in suite
    #[arg(long)]
    pub no_builtin: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub suites: SuiteArgs,

    /// Only run cases whose `suite::case` name contains this text
    #[arg(long, short)]
    pub filter: Option<String>,

    /// Raise IndexError on out-of-range access instead of returning defaults
    #[arg(long)]
    pub strict: bool,

    /// Stop at the first failing case
    #[arg(long)]
    pub fail_fast: bool,
}
