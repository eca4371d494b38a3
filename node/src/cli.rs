//! # CLI Interface
//!
//! Defines the command-line argument structure for `bastion-node` using
//! `clap` derive. Supports four subcommands: `run`, `init`, `replay`,
//! and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use bastion_protocol::config::{DEFAULT_API_PORT, DEFAULT_METRICS_PORT};

use crate::logging::LogFormat;

/// Bastion gated token node.
///
/// Deploys one compliance-gated token from a deployment file, serves it
/// over HTTP and exposes Prometheus metrics.
#[derive(Parser, Debug)]
#[command(
    name = "bastion-node",
    about = "Bastion gated token node",
    version,
    propagate_version = true
)]
pub struct BastionNodeCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, env = "BASTION_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the token and serve the API.
    Run(RunArgs),
    /// Write a sample deployment file.
    Init(InitArgs),
    /// Deploy the token and apply a script of calls, then print the
    /// resulting token summary.
    Replay(ReplayArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the deployment file (JSON).
    #[arg(long, short = 'c', env = "BASTION_CONFIG")]
    pub config: PathBuf,

    /// Port for the REST API.
    #[arg(long, env = "BASTION_API_PORT", default_value_t = DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "BASTION_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,
}

/// Arguments for the `init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the sample deployment file.
    #[arg(long, short = 'o', default_value = "bastion.json")]
    pub output: PathBuf,

    /// Overwrite `output` if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the deployment file (JSON).
    #[arg(long, short = 'c', env = "BASTION_CONFIG")]
    pub config: PathBuf,

    /// JSON array of invocations to apply in order.
    #[arg(long, short = 's')]
    pub script: PathBuf,
}
