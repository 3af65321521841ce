//! Conductor CLI Application
//!
//! Command-line front end, line-delimited JSON adapter and MCP server for the
//! Conductor run engine.

mod args;
mod cli;
mod mcp;
mod renderer;
mod stdio;

use std::path::Path;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use conductor_core::{params::QueryPlans, Engine, EngineBuilder, PlanCatalog, RawEngineConfig};
use log::info;
use mcp::{run_stdio_server, ConductorMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

/// Catalog used when `--catalog` is not given.
const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

fn load_catalog(path: Option<&Path>) -> Result<PlanCatalog> {
    match path {
        Some(path) => PlanCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog '{}'", path.display())),
        None => PlanCatalog::from_json_str(SAMPLE_CATALOG)
            .context("Failed to load the bundled sample catalog"),
    }
}

fn build_engine(catalog: PlanCatalog, config: &RawEngineConfig) -> Result<Engine> {
    EngineBuilder::new()
        .with_catalog(catalog)
        .with_raw_config(config)
        .build()
        .context("Failed to initialize engine")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        catalog,
        step_duration,
        source,
        no_color,
        command,
    } = Args::parse();

    let catalog = load_catalog(catalog.as_deref())?;
    let config = RawEngineConfig {
        source,
        step_duration,
    };
    let renderer = TerminalRenderer::new(!no_color);

    info!("Conductor started with {} plans", catalog.len());

    match command {
        Some(Serve) => stdio::serve(catalog, config)
            .await
            .context("Stdio adapter failed"),
        Some(Mcp) => {
            let engine = build_engine(catalog, &config)?;
            run_stdio_server(ConductorMcpServer::new(engine))
                .await
                .context("MCP server failed")
        }
        Some(Plan { command }) => {
            Cli::new(build_engine(catalog, &config)?, renderer)
                .handle_plan_command(command)
                .await
        }
        Some(Run(args)) => {
            Cli::new(build_engine(catalog, &config)?, renderer)
                .run_plan(args)
                .await
        }
        None => {
            Cli::new(build_engine(catalog, &config)?, renderer)
                .list_plans(&QueryPlans::default())
                .await
        }
    }
}
