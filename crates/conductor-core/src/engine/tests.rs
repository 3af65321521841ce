//! Tests for the engine module.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use serde_json::json;

use super::*;
use crate::{
    error::EngineError,
    models::{ExecutionMode, Plan, PlanStep, Run, RunStatus, StepStatus},
    params::{CompleteStep, Id, QueryPlans, QueryRuns, StartRun},
};

fn step(id: &str, mode: ExecutionMode, deps: &[&str]) -> PlanStep {
    PlanStep {
        id: id.to_string(),
        title: format!("Step {id}"),
        mode,
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
        ..Default::default()
    }
}

fn test_catalog() -> PlanCatalog {
    PlanCatalog::new(vec![
        Plan {
            id: "P".to_string(),
            title: "Automated then manual".to_string(),
            steps: vec![
                step("s1", ExecutionMode::Automated, &[]),
                step("s2", ExecutionMode::Manual, &["s1"]),
            ],
            tags: BTreeMap::from([("team".to_string(), "sre".to_string())]),
            ..Default::default()
        },
        Plan {
            id: "join".to_string(),
            title: "Manual join".to_string(),
            steps: vec![
                step("a", ExecutionMode::Manual, &[]),
                step("b", ExecutionMode::Manual, &[]),
                step("d", ExecutionMode::Manual, &["a", "b"]),
            ],
            ..Default::default()
        },
        Plan {
            id: "chain".to_string(),
            title: "Automated chain".to_string(),
            steps: vec![
                step("c1", ExecutionMode::Automated, &[]),
                step("c2", ExecutionMode::Automated, &["c1"]),
                step("c3", ExecutionMode::Automated, &["c2"]),
            ],
            ..Default::default()
        },
    ])
    .expect("test catalog is valid")
}

/// Helper function to create an engine driven by a manual executor
fn create_test_engine() -> (Arc<ManualExecutor>, Engine) {
    let executor = Arc::new(ManualExecutor::new());
    let engine = EngineBuilder::new()
        .with_catalog(test_catalog())
        .with_step_duration(Duration::from_millis(250))
        .with_executor(executor.clone())
        .build()
        .expect("Failed to create engine");
    (executor, engine)
}

async fn start(engine: &Engine, plan_id: &str) -> Run {
    engine
        .start_run(&StartRun::new(plan_id))
        .await
        .expect("Failed to start run")
}

async fn complete(engine: &Engine, run_id: &str, step_id: &str) -> Run {
    engine
        .complete_step(&CompleteStep::new(run_id, step_id, "alice", "done"))
        .await
        .expect("Failed to complete step")
}

async fn fetch(engine: &Engine, run_id: &str) -> Run {
    engine
        .get_run(&Id::new(run_id))
        .await
        .expect("Failed to get run")
}

#[tokio::test]
async fn test_automated_then_manual_scenario() {
    let (executor, engine) = create_test_engine();

    let run = start(&engine, "P").await;
    assert_eq!(run.id, "run-001");
    assert_eq!(run.status, RunStatus::Running);
    assert_eq!(run.step_status("s1"), Some(StepStatus::Running));
    assert_eq!(run.step_status("s2"), Some(StepStatus::Pending));
    assert_eq!(executor.delays(), vec![Duration::from_millis(250)]);

    assert_eq!(executor.run_until_idle().await, 1);

    let run = fetch(&engine, &run.id).await;
    let s1 = run.step_state("s1").unwrap();
    assert_eq!(s1.status, StepStatus::Succeeded);
    assert_eq!(s1.actor, AUTOMATION_ACTOR);
    assert_eq!(s1.note, AUTOMATION_NOTE);
    assert!(s1.finished_at.is_some());
    assert_eq!(run.step_status("s2"), Some(StepStatus::Ready));
    assert_eq!(run.status, RunStatus::Running);

    let run = complete(&engine, &run.id, "s2").await;
    let s2 = run.step_state("s2").unwrap();
    assert_eq!(s2.status, StepStatus::Succeeded);
    assert_eq!(s2.actor, "alice");
    assert_eq!(s2.note, "done");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(executor.pending(), 0);
}

#[tokio::test]
async fn test_drained_executor_releases_engine() {
    let (executor, engine) = create_test_engine();
    start(&engine, "chain").await;
    assert_eq!(executor.pending(), 1);

    assert_eq!(executor.run_until_idle().await, 3);
    drop(engine);
    assert_eq!(Arc::strong_count(&executor), 1);
}

#[tokio::test]
async fn test_not_found_errors() {
    let (_executor, engine) = create_test_engine();

    let err = engine.start_run(&StartRun::new("nope")).await.unwrap_err();
    assert!(matches!(err, EngineError::PlanNotFound { .. }));
    assert_eq!(err.code(), "not_found");

    let err = engine
        .complete_step(&CompleteStep::new("run-999", "s1", "alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RunNotFound { .. }));

    let run = start(&engine, "join").await;
    let err = engine
        .complete_step(&CompleteStep::new(&run.id, "zzz", "alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StepNotFound { .. }));
    assert_eq!(err.code(), "not_found");

    assert!(engine.get_run(&Id::new("run-404")).await.unwrap_err().is_not_found());
    assert!(engine.get_plan(&Id::new("nope")).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_readiness_seeding() {
    let (executor, engine) = create_test_engine();

    let run = start(&engine, "join").await;
    assert_eq!(run.status, RunStatus::Created);
    assert_eq!(run.step_status("a"), Some(StepStatus::Ready));
    assert_eq!(run.step_status("b"), Some(StepStatus::Ready));
    assert_eq!(run.step_status("d"), Some(StepStatus::Pending));
    assert_eq!(executor.pending(), 0);

    let run = start(&engine, "chain").await;
    assert_eq!(run.step_status("c1"), Some(StepStatus::Running));
    assert_eq!(run.step_status("c2"), Some(StepStatus::Pending));
    assert_eq!(run.steps.len(), run.plan.steps.len());
    assert_eq!(executor.pending(), 1);
}

#[tokio::test]
async fn test_join_unblocks_after_both_dependencies() {
    let (_executor, engine) = create_test_engine();
    let run = start(&engine, "join").await;

    let run = complete(&engine, &run.id, "a").await;
    assert_eq!(run.step_status("d"), Some(StepStatus::Pending));
    assert_eq!(run.status, RunStatus::Running);

    let run = complete(&engine, &run.id, "b").await;
    assert_eq!(run.step_status("d"), Some(StepStatus::Ready));
    assert_ne!(run.status, RunStatus::Completed);

    let run = complete(&engine, &run.id, "d").await;
    assert_eq!(run.status, RunStatus::Completed);
}

#[tokio::test]
async fn test_duplicate_completion_is_rejected() {
    let (_executor, engine) = create_test_engine();
    let run = start(&engine, "join").await;
    let first = complete(&engine, &run.id, "a").await;

    let err = engine
        .complete_step(&CompleteStep::new(&run.id, "a", "bob", "again"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StepAlreadySucceeded { .. }));
    assert_eq!(err.code(), "conflict");

    let after = fetch(&engine, &run.id).await;
    assert_eq!(after.step_state("a"), first.step_state("a"));
    assert_eq!(after.step_state("a").unwrap().actor, "alice");
}

#[tokio::test]
async fn test_automation_after_manual_completion_is_noop() {
    let (executor, engine) = create_test_engine();
    let run = start(&engine, "P").await;

    // Someone completes the automated step before its timer fires.
    let run = complete(&engine, &run.id, "s1").await;
    assert_eq!(run.step_status("s2"), Some(StepStatus::Ready));

    assert_eq!(executor.run_until_idle().await, 1);
    let run = fetch(&engine, &run.id).await;
    assert_eq!(run.step_state("s1").unwrap().actor, "alice");
}

#[tokio::test]
async fn test_pending_step_can_be_completed_directly() {
    let (_executor, engine) = create_test_engine();
    let run = start(&engine, "join").await;

    let run = complete(&engine, &run.id, "d").await;
    assert_eq!(run.step_status("d"), Some(StepStatus::Succeeded));
    assert_eq!(run.step_status("a"), Some(StepStatus::Ready));
    assert_eq!(run.status, RunStatus::Running);
}

#[tokio::test]
async fn test_status_never_regresses() {
    let (executor, engine) = create_test_engine();
    let run = start(&engine, "chain").await;
    let mut previous = run.clone();

    loop {
        if executor.run_pending().await == 0 {
            break;
        }
        let current = fetch(&engine, &run.id).await;
        for (before, after) in previous.steps.iter().zip(&current.steps) {
            assert!(
                before.status.rank() <= after.status.rank(),
                "step {} regressed from {:?} to {:?}",
                before.step_id,
                before.status,
                after.status
            );
        }
        previous = current;
    }

    assert_eq!(previous.status, RunStatus::Completed);
    assert!(previous
        .steps
        .iter()
        .all(|s| s.actor == AUTOMATION_ACTOR && s.started_at.is_some()));
}

#[tokio::test]
async fn test_returned_values_are_isolated() {
    let (_executor, engine) = create_test_engine();
    let run = start(&engine, "join").await;

    let mut copy = fetch(&engine, &run.id).await;
    copy.steps[0].status = StepStatus::Succeeded;
    copy.plan.title = "tampered".to_string();
    copy.scope.insert("env".to_string(), "prod".to_string());

    let fresh = fetch(&engine, &run.id).await;
    assert_eq!(fresh.steps[0].status, StepStatus::Ready);
    assert_eq!(fresh.plan.title, "Manual join");
    assert!(fresh.scope.is_empty());

    let mut plan = engine.get_plan(&Id::new("join")).await.unwrap();
    plan.steps.clear();
    let plan = engine.get_plan(&Id::new("join")).await.unwrap();
    assert_eq!(plan.steps.len(), 3);
}

#[tokio::test]
async fn test_source_metadata_and_scope() {
    let (_executor, engine) = create_test_engine();

    let run = start(&engine, "join").await;
    assert_eq!(run.metadata.get("source"), Some(&json!("conductor")));

    let run = engine
        .start_run(&StartRun {
            plan_id: "join".to_string(),
            scope: BTreeMap::from([("env".to_string(), "staging".to_string())]),
            metadata: BTreeMap::from([("source".to_string(), json!("pager"))]),
        })
        .await
        .unwrap();
    assert_eq!(run.id, "run-002");
    assert_eq!(run.metadata.get("source"), Some(&json!("pager")));
    assert_eq!(run.scope.get("env").map(String::as_str), Some("staging"));
}

#[tokio::test]
async fn test_query_runs_filters_and_limit() {
    let (executor, engine) = create_test_engine();
    start(&engine, "join").await;
    start(&engine, "P").await;
    start(&engine, "join").await;

    let all = engine.query_runs(&QueryRuns::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let joins = engine
        .query_runs(&QueryRuns {
            plan_ids: vec!["join".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(joins.len(), 2);

    let limited = engine
        .query_runs(&QueryRuns {
            plan_ids: vec!["join".to_string()],
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    let tagged = engine
        .query_runs(&QueryRuns {
            tags: BTreeMap::from([("team".to_string(), "sre".to_string())]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].plan_id, "P");

    executor.run_until_idle().await;
    let running = engine
        .query_runs(&QueryRuns {
            statuses: vec![RunStatus::Running],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(running.len(), 1);

    let by_text = engine
        .query_runs(&QueryRuns {
            query: Some("run-003".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_text.len(), 1);

    let summaries = engine
        .query_run_summaries(&QueryRuns::default())
        .await
        .unwrap();
    assert_eq!(summaries[1].succeeded_steps, 1);
    assert_eq!(summaries[1].ready_steps, 1);
}

#[tokio::test]
async fn test_query_plans() {
    let (_executor, engine) = create_test_engine();

    let all = engine.query_plans(&QueryPlans::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P", "join", "chain"]);

    let found = engine
        .query_plans(&QueryPlans {
            query: Some("chain".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let limited = engine
        .query_plans(&QueryPlans {
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_automation_timing_with_tokio_executor() {
    let step_duration = Duration::from_millis(20);
    let engine = EngineBuilder::new()
        .with_catalog(test_catalog())
        .with_step_duration(step_duration)
        .build()
        .expect("Failed to create engine");

    let run = start(&engine, "chain").await;
    let deadline = tokio::time::Instant::now() + step_duration * 3 + Duration::from_secs(2);

    let finished = loop {
        let current = fetch(&engine, &run.id).await;
        if current.status == RunStatus::Completed {
            break current;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "chain did not complete in time: {:?}",
            current.steps
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    assert!(finished
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Succeeded && s.actor == AUTOMATION_ACTOR));
    let c1 = finished.step_state("c1").unwrap().finished_at.unwrap();
    let c3 = finished.step_state("c3").unwrap().finished_at.unwrap();
    assert!(c1 < c3);
}
