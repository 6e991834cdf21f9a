//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// MPI partitioned-communication test orchestration harness
#[derive(Parser, Debug)]
#[command(name = "partcomm-harness")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(about = "Run the partitioned-communication test suite and report results")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable live colored per-test progress
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the test suite
    Run(RunArgs),

    /// List the expectation table
    List(ListArgs),

    /// Manage configuration files
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Suite file overriding the built-in expectation table
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Directory holding the test executables
    #[arg(short, long)]
    pub bin_dir: Option<String>,

    /// Parallel-process launcher executable
    #[arg(short, long)]
    pub launcher: Option<String>,

    /// Per-test deadline in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Settling delay between tests in seconds
    #[arg(long)]
    pub settle: Option<u64>,

    /// Directory under which the session directory is created
    #[arg(short, long)]
    pub output_root: Option<String>,

    /// Disable colored progress output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Suite file overriding the built-in expectation table
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Show expected markers and line locators
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./partcomm-harness.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,

        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        file: Option<String>,
    },
}
