//! Command-line handlers and their clap argument wrappers
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, so `conductor-core` stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Engine
//! ```

use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use conductor_core::{
    display::{OperationStatus, Plans},
    params::{CompleteStep, Id, QueryPlans, StartRun},
    Engine, Run, StepStatus,
};
use log::debug;

use crate::renderer::TerminalRenderer;

/// Actor recorded on steps completed through `conductor run --complete-manual`.
pub const CLI_ACTOR: &str = "cli";

const CLI_NOTE: &str = "Completed from the command line";

/// How often `conductor run` checks on in-flight automated steps.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Parses a `key=value` pair.
pub fn parse_key_value(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{text}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// List catalog plans
#[derive(Args)]
pub struct ListPlansArgs {
    #[arg(
        short,
        long,
        help = "Case-insensitive text matched against plan id, title and description"
    )]
    pub query: Option<String>,
    #[arg(
        short,
        long = "tag",
        value_parser = parse_key_value,
        help = "Only plans carrying this tag (key=value); repeatable"
    )]
    pub tags: Vec<(String, String)>,
}

impl From<ListPlansArgs> for QueryPlans {
    fn from(val: ListPlansArgs) -> Self {
        QueryPlans {
            query: val.query,
            tags: val.tags.into_iter().collect(),
            ..Default::default()
        }
    }
}

/// Show details of a specific plan
#[derive(Args)]
pub struct ShowPlanArgs {
    #[arg(help = "Identifier of the plan to show")]
    pub id: String,
}

impl From<ShowPlanArgs> for Id {
    fn from(val: ShowPlanArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List catalog plans
    #[command(alias = "l")]
    List(ListPlansArgs),
    /// Show details of a specific plan
    #[command(alias = "s")]
    Show(ShowPlanArgs),
}

/// Start a run of a plan
///
/// The command waits until no automated step is running. With
/// `--complete-manual` every manual step is completed as soon as it becomes
/// ready, which drives the run to completion.
#[derive(Args)]
pub struct RunPlanArgs {
    #[arg(help = "Identifier of the plan to run")]
    pub plan_id: String,
    #[arg(
        short,
        long,
        value_parser = parse_key_value,
        help = "Scope entry for the run (key=value); repeatable"
    )]
    pub scope: Vec<(String, String)>,
    #[arg(long, help = "Complete manual steps as they become ready")]
    pub complete_manual: bool,
}

impl From<&RunPlanArgs> for StartRun {
    fn from(val: &RunPlanArgs) -> Self {
        StartRun {
            plan_id: val.plan_id.clone(),
            scope: val.scope.iter().cloned().collect(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Command handlers sharing one engine and renderer.
pub struct Cli {
    engine: Engine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: Engine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(&args.into()).await,
        }
    }

    pub async fn list_plans(&self, params: &QueryPlans) -> Result<()> {
        let plans = self
            .engine
            .query_plans(params)
            .await
            .context("Failed to list plans")?;

        let mut output = String::from("# Plans\n\n");
        output.push_str(&Plans(plans).to_string());
        self.renderer.render(&output)
    }

    async fn show_plan(&self, params: &Id) -> Result<()> {
        let plan = self
            .engine
            .get_plan(params)
            .await
            .with_context(|| format!("Failed to show plan '{}'", params.id))?;
        self.renderer.render(&plan.to_string())
    }

    pub async fn run_plan(&self, args: RunPlanArgs) -> Result<()> {
        let run = self
            .engine
            .start_run(&StartRun::from(&args))
            .await
            .with_context(|| format!("Failed to start a run of plan '{}'", args.plan_id))?;

        let (run, completed) = self.follow(run, args.complete_manual).await?;

        let mut output = run.to_string();
        if !completed.is_empty() {
            let status = OperationStatus::success(format!(
                "Completed {} manual step(s) as '{CLI_ACTOR}'",
                completed.len()
            ))
            .with_details(completed);
            output.push('\n');
            output.push_str(&status.to_string());
        }
        self.renderer.render(&output)
    }

    /// Waits until no step is running, optionally completing ready manual
    /// steps along the way. Returns the settled run and the steps completed
    /// here.
    async fn follow(&self, run: Run, complete_manual: bool) -> Result<(Run, Vec<String>)> {
        let id = Id::new(run.id);
        let mut completed = Vec::new();

        loop {
            let run = self
                .engine
                .get_run(&id)
                .await
                .with_context(|| format!("Failed to fetch run '{}'", id.id))?;

            let ready: Vec<String> = run
                .steps_with_status(StepStatus::Ready)
                .into_iter()
                .map(str::to_string)
                .collect();
            if complete_manual && !ready.is_empty() {
                for step_id in ready {
                    debug!("completing manual step '{}' of run '{}'", step_id, id.id);
                    self.engine
                        .complete_step(&CompleteStep::new(&id.id, &step_id, CLI_ACTOR, CLI_NOTE))
                        .await
                        .with_context(|| format!("Failed to complete step '{step_id}'"))?;
                    completed.push(step_id);
                }
                continue;
            }

            if run.steps_with_status(StepStatus::Running).is_empty() {
                return Ok((run, completed));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
