// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod server;
pub mod state;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::validate::parse_bind;
use crate::config::ConfigFile;
use crate::engine::{Orchestrator, RunnerOptions};
use crate::exec::{InstallerBackend, ScriptInstaller};
use crate::server::AppState;
use crate::types::format_duration;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - installer backend / runner / sequencer
/// - HTTP server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let backend = Arc::new(ScriptInstaller::new(cfg.installer.program.clone()));
    let installer = backend.program().display().to_string();
    let orchestrator = build_orchestrator(&cfg, backend);
    let state = AppState::new(orchestrator, cfg.server.index_page.clone());

    let listener = TcpListener::bind(cfg.server.bind)
        .await
        .with_context(|| format!("binding http listener on {}", cfg.server.bind))?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        prompts = cfg.prompts.len(),
        %installer,
        "installer-shim ready"
    );
    println!("Serving at http://{addr}");

    server::serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

/// Build the orchestrator for a validated config and a given backend.
pub fn build_orchestrator(
    cfg: &ConfigFile,
    backend: Arc<dyn InstallerBackend>,
) -> Arc<Orchestrator> {
    Arc::new(Orchestrator::new(
        cfg.prompts.clone(),
        backend,
        RunnerOptions::from(&cfg.installer),
    ))
}

/// Load the config file named on the command line and apply CLI overrides.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config from {}", args.config))?;

    if let Some(ref bind) = args.bind {
        cfg.server.bind = parse_bind(bind)?;
    }
    if let Some(ref program) = args.installer {
        if program.trim().is_empty() {
            anyhow::bail!("--installer must not be empty");
        }
        cfg.installer.program = PathBuf::from(program);
    }

    Ok(cfg)
}

/// Resolves on Ctrl-C. If the signal handler can't be installed the server
/// just keeps running.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received; shutting down"),
        Err(e) => {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("installer-shim dry-run");
    println!("  server.bind = {}", cfg.server.bind);
    println!("  server.index_page = {}", cfg.server.index_page.display());
    println!("  installer.program = {}", cfg.installer.program.display());
    println!(
        "  installer.line_delay = {}",
        format_duration(cfg.installer.line_delay)
    );
    println!("  installer.error_marker = {:?}", cfg.installer.error_marker);
    println!();

    println!("prompts ({}):", cfg.prompts.len());
    for (idx, prompt) in cfg.prompts.iter().enumerate() {
        println!("  {}. {prompt}", idx + 1);
    }

    debug!("dry-run complete (nothing served)");
}
