//! MCP server implementation for Conductor
//!
//! Exposes the run engine to AI assistants over the Model Context Protocol.
//! Every tool returns the same markdown the CLI prints.

use anyhow::Result;
use conductor_core::Engine;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{CompleteStep, Id, McpResult, QueryPlans, QueryRuns, StartRun};

const INSTRUCTIONS: &str = r#"Conductor runs operational plans (runbooks) whose steps form a dependency graph.

## Core Concepts
- **Plans**: Read-only templates from the catalog. Each step is `manual` or `automated` and may depend on other steps.
- **Runs**: A started plan. Every step moves pending → ready (manual) or running (automated) → succeeded.
- Automated steps complete on their own after a short delay. Manual steps wait for `complete_step`.

## Workflow
1. Find a plan with `list_plans` and inspect it with `show_plan`
2. Start it with `start_run`, optionally passing a `scope` such as {"env": "prod"}
3. Poll `show_run` and call `complete_step` for each step shown as Ready
4. The run is completed once every step has succeeded

## Tool Categories
- **Catalog**: list_plans, show_plan
- **Runs**: list_runs, show_run, start_run, complete_step

Completing a step twice is rejected. Run state lives in memory and is lost when the server stops."#;

/// MCP server for Conductor
#[derive(Clone)]
pub struct ConductorMcpServer {
    engine: Engine,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ConductorMcpServer {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.engine.clone())
    }

    #[tool(
        name = "list_plans",
        description = "List plans in the catalog. Optionally filter by ids, a case-insensitive text query over id/title/description, tags (all must match) and a limit. Returns each plan's id, title, step count and tags."
    )]
    async fn list_plans(&self, params: Parameters<QueryPlans>) -> McpResult {
        self.handlers().list_plans(params).await
    }

    #[tool(
        name = "show_plan",
        description = "Show a plan template by id: its description, tags and every step with its execution mode (manual/automated) and dependencies."
    )]
    async fn show_plan(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_plan(params).await
    }

    #[tool(
        name = "list_runs",
        description = "List runs in creation order with progress counts. Optionally filter by statuses (created, running, completed), plan_ids, scope entries, a text query over run and plan ids, plan tags and a limit."
    )]
    async fn list_runs(&self, params: Parameters<QueryRuns>) -> McpResult {
        self.handlers().list_runs(params).await
    }

    #[tool(
        name = "show_run",
        description = "Show a run by id (e.g. run-001) with the status, actor, note and timestamps of each step. Steps shown as Ready are waiting for complete_step."
    )]
    async fn show_run(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_run(params).await
    }

    #[tool(
        name = "start_run",
        description = "Start a new run of a plan. Requires plan_id; optional scope (string map, e.g. {\"env\": \"prod\"}) and metadata. Steps without dependencies start immediately: manual ones become Ready and automated ones start Running."
    )]
    async fn start_run(&self, params: Parameters<StartRun>) -> McpResult {
        self.handlers().start_run(params).await
    }

    #[tool(
        name = "complete_step",
        description = "Mark a step of a run as succeeded. Requires run_id and step_id; provide actor (who did it) and an optional note. Dependent steps whose dependencies have all succeeded are unblocked. Completing an already succeeded step is rejected."
    )]
    async fn complete_step(&self, params: Parameters<CompleteStep>) -> McpResult {
        self.handlers().complete_step(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ConductorMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "conductor".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: ConductorMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Conductor MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
