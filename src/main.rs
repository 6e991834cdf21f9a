//! partcomm-harness - MPI Partitioned-Communication Test Harness
//!
//! A CLI tool that runs the partitioned-communication test suite through a
//! parallel-process launcher, supervises each test with a kill-on-deadline
//! watchdog, classifies the captured stderr output against an expectation
//! table, and writes a pass/fail report.
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in suite with live progress
//! partcomm-harness run --verbose
//!
//! # Run against a different test build with a longer deadline
//! partcomm-harness run --bin-dir ./build/tests --timeout 60
//!
//! # Run an edited expectation table
//! partcomm-harness run --suite ./suite.yaml
//!
//! # Inspect the expectation table
//! partcomm-harness list --detailed
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod classifier;
mod cli;
mod config;
mod executor;
mod models;
mod output;
mod report;
mod suite;
mod utils;

use cli::Args;
use config::ConfigFile;
use executor::TestRunner;
use models::TestCase;
use output::ProgressPrinter;
use report::{ReportSession, RunReport};
use utils::logger::{init_logger, LogLevel};
use utils::timer::Timer;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    init_logger(level);

    match args.command {
        cli::Command::Run(run_args) => {
            run_suite(run_args, args.verbose).await?;
        }
        cli::Command::List(list_args) => {
            list_suite(list_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args)?;
        }
    }

    Ok(())
}

/// Resolve the effective configuration and suite, then run every test.
async fn run_suite(args: cli::RunArgs, verbose: bool) -> Result<()> {
    let config_file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_default()?,
    };

    let mut config = config_file.harness.clone();
    if let Some(bin_dir) = &args.bin_dir {
        config = config.with_bin_dir(bin_dir);
    }
    if let Some(launcher) = &args.launcher {
        config = config.with_launcher(launcher);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(settle) = args.settle {
        config = config.with_settle(settle);
    }
    if let Some(output_root) = &args.output_root {
        config = config.with_session_root(output_root);
    }
    config.validate()?;

    let suite_path = args
        .suite
        .map(std::path::PathBuf::from)
        .or(config_file.suite);
    let suite = load_suite(suite_path.as_deref())?;

    info!(
        "running {} tests via {} ({} ranks, {}s deadline)",
        suite.len(),
        config.launcher,
        config.ranks,
        config.timeout_secs
    );

    // Session directory and report file are created before any test runs;
    // a failure here aborts with a non-zero exit.
    let session = ReportSession::create(&config)?;

    let printer = if args.no_color {
        ProgressPrinter::new(verbose).no_color()
    } else {
        ProgressPrinter::new(verbose)
    };

    let runner = TestRunner::new(config);
    let mut run_report = RunReport::new(suite.iter().map(|c| c.id.clone()).collect());

    let timer = Timer::start("test run");
    let total = suite.len();

    for (index, case) in suite.iter().enumerate() {
        printer.announce(index + 1, total, &case.id);

        let verdict = runner.run_test(case, &session).await?;
        info!("{} : {}", case.id, verdict);

        printer.verdict(&verdict);
        run_report.record(case.id.clone(), verdict);

        runner.settle().await;
    }

    run_report.finalize(timer.stop());
    session.write_report(&run_report)?;

    printer.summary(&run_report);
    info!(
        "{}/{} passed, report written to {}",
        run_report.passed(),
        run_report.total(),
        session.report_path().display()
    );

    Ok(())
}

fn load_suite(path: Option<&std::path::Path>) -> Result<Vec<TestCase>> {
    match path {
        Some(path) => suite::load_file(path),
        None => Ok(suite::builtin()),
    }
}

fn list_suite(args: cli::ListArgs) -> Result<()> {
    let suite = load_suite(args.suite.as_deref().map(std::path::Path::new))?;

    println!("\nPartitioned-Communication Test Suite ({} tests)\n", suite.len());
    println!("──────────────────────────────────────────────────────────────────────");

    for (index, case) in suite.iter().enumerate() {
        if args.detailed {
            println!("  {:2}. {:24} expects {}", index + 1, case.id, case.expectation);
        } else {
            println!("  {:2}. {}", index + 1, case.id);
        }
    }

    println!("──────────────────────────────────────────────────────────────────────\n");

    Ok(())
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    use std::path::Path;

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            let config = ConfigFile::example();
            config.save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { file, format } => {
            let config = match file {
                Some(path) => ConfigFile::load(&path)?,
                None => ConfigFile::load_default()?,
            };
            let rendered = if format == "json" {
                serde_json::to_string_pretty(&config)?
            } else {
                serde_yaml::to_string(&config)?
            };
            println!("{rendered}");
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./partcomm-harness.yaml".to_string())
            });

            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
