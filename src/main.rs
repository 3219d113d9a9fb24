//! polyrt conformance runner entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command, RunArgs, SuiteArgs};
use polyrt::{HarnessResult, RunReport, Runner, RunnerConfig, Suite};
use polyrt_core::IndexPolicy;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::List(args) => list(args).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SuiteArgs) -> HarnessResult<RunnerConfig> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    config.suites.extend(args.suites.iter().cloned());
    if args.no_builtin {
        config.include_builtin = false;
    }
    Ok(config)
}

fn load_suites(config: &RunnerConfig) -> HarnessResult<Vec<Suite>> {
    let mut suites = Vec::new();
    if config.include_builtin {
        suites.push(Suite::builtin()?);
    }
    for path in &config.suites {
        suites.push(Suite::load(path)?);
    }
    Ok(suites)
}

/// Returns whether every selected case passed.
fn run(args: RunArgs) -> HarnessResult<bool> {
    let mut config = load_config(&args.suites)?;
    if let Some(filter) = args.filter {
        config.filter = Some(filter);
    }
    if args.strict {
        config.index_policy = IndexPolicy::Strict;
    }
    config.fail_fast |= args.fail_fast;

    let suites = load_suites(&config)?;
    let report: RunReport = Runner::new(config).run(&suites)?;
    println!("{report}");
    Ok(report.is_success())
}

fn list(args: SuiteArgs) -> HarnessResult<()> {
    let config = load_config(&args)?;
    for suite in load_suites(&config)? {
        let count = suite.cases.len();
        match &suite.description {
            Some(description) => println!("{} ({count} cases): {description}", suite.name),
            None => println!("{} ({count} cases)", suite.name),
        }
        for case in &suite.cases {
            println!("  {} [{}]", case.name, case.op);
        }
    }
    Ok(())
}
