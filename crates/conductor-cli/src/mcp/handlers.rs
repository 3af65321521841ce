//! MCP tool handlers implementation

use conductor_core::{
    display::{OperationStatus, Plans, RunSummaries},
    params as core, Engine, RunStatus,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types only derive `JsonSchema` behind a feature flag and know
// nothing about MCP. The transparent wrapper below lets rmcp deserialize them
// and publish their schema unchanged.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type QueryPlans = McpParams<core::QueryPlans>;
pub type QueryRuns = McpParams<core::QueryRuns>;
pub type StartRun = McpParams<core::StartRun>;
pub type CompleteStep = McpParams<core::CompleteStep>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn markdown(text: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    engine: Engine,
}

impl McpHandlers {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub async fn list_plans(&self, Parameters(params): Parameters<QueryPlans>) -> McpResult {
        debug!("list_plans: {:?}", params);

        let plans = self
            .engine
            .query_plans(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;

        markdown(format!("# Plans\n\n{}", Plans(plans)))
    }

    pub async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_plan: {:?}", params);

        let plan = self
            .engine
            .get_plan(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show plan", &e))?;

        markdown(plan.to_string())
    }

    pub async fn list_runs(&self, Parameters(params): Parameters<QueryRuns>) -> McpResult {
        debug!("list_runs: {:?}", params);

        let summaries = self
            .engine
            .query_run_summaries(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list runs", &e))?;

        markdown(format!("# Runs\n\n{}", RunSummaries(summaries)))
    }

    pub async fn show_run(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_run: {:?}", params);

        let run = self
            .engine
            .get_run(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show run", &e))?;

        markdown(run.to_string())
    }

    pub async fn start_run(&self, Parameters(params): Parameters<StartRun>) -> McpResult {
        debug!("start_run: {:?}", params);

        let run = self
            .engine
            .start_run(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to start run", &e))?;

        let status = OperationStatus::success(format!(
            "Started run {} of plan '{}'",
            run.id, run.plan_id
        ));
        markdown(format!("{status}\n{run}"))
    }

    pub async fn complete_step(&self, Parameters(params): Parameters<CompleteStep>) -> McpResult {
        debug!("complete_step: {:?}", params);

        let inner = params.as_ref();
        let run = self
            .engine
            .complete_step(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to complete step", &e))?;

        let mut message = format!("Step '{}' of run {} succeeded", inner.step_id, run.id);
        if run.status == RunStatus::Completed {
            message.push_str("; the run is complete");
        }
        markdown(format!("{}\n{run}", OperationStatus::success(message)))
    }
}
