use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{PlanCommands, RunPlanArgs};

/// Orchestration run engine for DAG-shaped operational plans
///
/// Conductor starts runs from a catalog of plan templates and tracks every
/// step until the run completes. Manual steps wait for a human; automated
/// steps complete themselves after the configured step duration. Besides the
/// interactive commands it can serve a line-delimited JSON protocol or an MCP
/// server over stdio.
#[derive(Parser)]
#[command(version, about, name = "conductor")]
pub struct Args {
    /// Path to a JSON plan catalog. Defaults to the bundled sample catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Delay before automated steps complete, e.g. "2s", "500ms" or "PT1S"
    #[arg(long, global = true)]
    pub step_duration: Option<String>,

    /// Source label recorded in the metadata of every run
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Conductor CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Browse the plan catalog
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Start a run of a plan and follow it until automation settles
    #[command(alias = "r")]
    Run(RunPlanArgs),
    /// Serve the line-delimited JSON protocol on stdin/stdout
    Serve,
    /// Start the MCP server on stdio
    Mcp,
}
