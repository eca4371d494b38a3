// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Bastion Node
//!
//! Entry point for the `bastion-node` binary. Parses CLI arguments,
//! initializes logging and metrics, deploys the configured token and
//! serves it over HTTP.
//!
//! The binary supports four subcommands:
//!
//! - `run`    : deploy the token and serve the API
//! - `init`   : write a sample deployment file
//! - `replay` : deploy the token and apply a script of calls
//! - `version`: print build version information

mod api;
mod cli;
mod config;
mod logging;
mod metrics;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

use bastion_contracts::Invocation;

use cli::{BastionNodeCli, Commands};
use config::DeploymentConfig;
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = BastionNodeCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Init(args) => init_node(args),
        Commands::Replay(args) => replay(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn version_string() -> String {
    format!(
        "{} (protocol {})",
        env!("CARGO_PKG_VERSION"),
        bastion_protocol::config::PROTOCOL_VERSION,
    )
}

/// Deploys the token and serves the API and metrics endpoints until a
/// shutdown signal arrives.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    let deployment = DeploymentConfig::load(&args.config)?;
    let token = deployment.deploy()?;

    tracing::info!(
        config = %args.config.display(),
        api_port = args.api_port,
        metrics_port = args.metrics_port,
        deployment_id = %token.deployment_id(),
        "starting bastion-node"
    );

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());

    // --- Application state ---
    let app_state = api::AppState::new(version_string(), token, Arc::clone(&node_metrics));

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.api_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("bastion-node stopped");
    Ok(())
}

/// Writes a sample deployment file.
fn init_node(args: cli::InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            args.output.display()
        );
    }

    let sample = DeploymentConfig::sample();
    sample.save(&args.output)?;
    tracing::info!(output = %args.output.display(), "sample deployment written");

    println!("Deployment file written.");
    println!("  Path     : {}", args.output.display());
    println!("  Token    : {} ({})", sample.token.name, sample.token.symbol);
    println!("  Owner    : {}", sample.token.owner);

    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<Invocation>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))
}

/// Deploys the token, applies every invocation in the script in order and
/// prints the final token summary. Rejected calls are reported and skipped.
fn replay(args: cli::ReplayArgs) -> Result<()> {
    let deployment = DeploymentConfig::load(&args.config)?;
    let script = load_script(&args.script)?;
    let mut token = deployment.deploy()?;

    let mut rejected = 0usize;
    for (index, invocation) in script.into_iter().enumerate() {
        let method = invocation.call.method();
        let caller = invocation.caller;
        match token.invoke(invocation) {
            Ok(()) => println!("#{index:<4} {method:<20} {caller} accepted"),
            Err(err) => {
                rejected += 1;
                println!(
                    "#{index:<4} {method:<20} {caller} rejected {}: {}",
                    err.code(),
                    err
                );
            }
        }
    }

    tracing::info!(
        rejected,
        events = token.events().len(),
        "replay finished"
    );

    let info = serde_json::to_string_pretty(&token.info()).context("failed to encode token info")?;
    println!("{info}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("bastion-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol     {}", bastion_protocol::config::PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
