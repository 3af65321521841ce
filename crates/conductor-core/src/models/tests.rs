use std::collections::BTreeMap;

use jiff::Timestamp;
use serde_json::json;

use super::*;

fn create_test_plan() -> Plan {
    Plan {
        id: "db-failover".to_string(),
        title: "Database failover".to_string(),
        description: "Promote the replica and repoint writers".to_string(),
        steps: vec![
            PlanStep {
                id: "freeze".to_string(),
                title: "Freeze writes".to_string(),
                mode: ExecutionMode::Automated,
                ..Default::default()
            },
            PlanStep {
                id: "promote".to_string(),
                title: "Promote replica".to_string(),
                depends_on: vec!["freeze".to_string()],
                ..Default::default()
            },
        ],
        tags: BTreeMap::from([("team".to_string(), "storage".to_string())]),
        ..Default::default()
    }
}

fn create_test_run(statuses: &[StepStatus]) -> Run {
    let plan = create_test_plan();
    let steps = plan
        .steps
        .iter()
        .zip(statuses)
        .map(|(step, status)| StepState::new(step.id.clone(), *status))
        .collect();
    Run {
        id: "run-007".to_string(),
        plan_id: plan.id.clone(),
        plan,
        steps,
        status: RunStatus::Created,
        created_at: Timestamp::from_second(1640995200).unwrap(),
        updated_at: Timestamp::from_second(1640995200).unwrap(),
        scope: BTreeMap::from([("env".to_string(), "prod".to_string())]),
        metadata: BTreeMap::new(),
    }
}

#[test]
fn test_step_status_progression_order() {
    assert!(StepStatus::Pending < StepStatus::Ready);
    assert!(StepStatus::Running < StepStatus::Succeeded);
    assert_eq!(StepStatus::Ready.rank(), StepStatus::Running.rank());
    assert!(StepStatus::Pending.rank() < StepStatus::Succeeded.rank());
}

#[test]
fn test_status_parsing() {
    assert_eq!("Succeeded".parse::<StepStatus>(), Ok(StepStatus::Succeeded));
    assert_eq!("completed".parse::<RunStatus>(), Ok(RunStatus::Completed));
    assert_eq!("auto".parse::<ExecutionMode>(), Ok(ExecutionMode::Automated));
    assert!("done".parse::<StepStatus>().is_err());
}

#[test]
fn test_plan_deserializes_with_defaults() {
    let plan: Plan = serde_json::from_value(json!({
        "id": "p1",
        "title": "Minimal",
        "steps": [
            { "id": "a", "title": "A" },
            { "id": "b", "title": "B", "mode": "automated", "depends_on": ["a"] }
        ]
    }))
    .unwrap();

    assert_eq!(plan.steps[0].mode, ExecutionMode::Manual);
    assert!(plan.steps[1].is_automated());
    assert!(plan.steps[1].depends_on_step("a"));
    assert!(plan.tags.is_empty());
}

#[test]
fn test_legacy_automated_flag_detection() {
    let mut step = PlanStep {
        id: "old".to_string(),
        title: "Old style".to_string(),
        ..Default::default()
    };
    assert!(!step.has_legacy_automated_flag());

    step.metadata.insert("automated".to_string(), json!("yes"));
    assert!(!step.has_legacy_automated_flag());

    step.metadata.insert("automated".to_string(), json!(true));
    assert!(step.has_legacy_automated_flag());
}

#[test]
fn test_run_derive_status() {
    let run = create_test_run(&[StepStatus::Pending, StepStatus::Pending]);
    assert_eq!(run.derive_status(), RunStatus::Created);

    let run = create_test_run(&[StepStatus::Ready, StepStatus::Pending]);
    assert_eq!(run.derive_status(), RunStatus::Created);

    let run = create_test_run(&[StepStatus::Running, StepStatus::Pending]);
    assert_eq!(run.derive_status(), RunStatus::Running);

    let run = create_test_run(&[StepStatus::Succeeded, StepStatus::Ready]);
    assert_eq!(run.derive_status(), RunStatus::Running);

    let run = create_test_run(&[StepStatus::Succeeded, StepStatus::Succeeded]);
    assert_eq!(run.derive_status(), RunStatus::Completed);
    assert!(run.all_succeeded());
}

#[test]
fn test_run_summary_counts() {
    let run = create_test_run(&[StepStatus::Succeeded, StepStatus::Ready]);
    let summary = RunSummary::from(&run);

    assert_eq!(summary.title, "Database failover");
    assert_eq!(summary.total_steps, 2);
    assert_eq!(summary.succeeded_steps, 1);
    assert_eq!(summary.ready_steps, 1);
    assert_eq!(summary.pending_steps, 0);
    assert_eq!(summary.running_steps, 0);
}

#[test]
fn test_run_filter_matching() {
    let mut run = create_test_run(&[StepStatus::Running, StepStatus::Pending]);
    run.status = RunStatus::Running;

    assert!(RunFilter::default().matches(&run));

    let by_status = RunFilter {
        statuses: vec![RunStatus::Completed],
        ..Default::default()
    };
    assert!(!by_status.matches(&run));

    let by_scope = RunFilter {
        scope: BTreeMap::from([("env".to_string(), "prod".to_string())]),
        ..Default::default()
    };
    assert!(by_scope.matches(&run));

    let wrong_scope = RunFilter {
        scope: BTreeMap::from([("env".to_string(), "staging".to_string())]),
        ..Default::default()
    };
    assert!(!wrong_scope.matches(&run));

    let by_query = RunFilter {
        query: Some("FAILOVER".to_string()),
        ..Default::default()
    };
    assert!(by_query.matches(&run));

    let by_tag = RunFilter {
        tags: BTreeMap::from([("team".to_string(), "network".to_string())]),
        ..Default::default()
    };
    assert!(!by_tag.matches(&run));

    let by_plan = RunFilter {
        plan_ids: vec!["other".to_string(), "db-failover".to_string()],
        ..Default::default()
    };
    assert!(by_plan.matches(&run));
}

#[test]
fn test_plan_filter_matching() {
    let plan = create_test_plan();

    assert!(PlanFilter::default().matches(&plan));

    let by_text = PlanFilter {
        query: Some("replica".to_string()),
        ..Default::default()
    };
    assert!(by_text.matches(&plan));

    let blank = PlanFilter {
        query: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(blank.matches(&plan));

    let by_id = PlanFilter {
        ids: vec!["elsewhere".to_string()],
        ..Default::default()
    };
    assert!(!by_id.matches(&plan));

    let by_tag = PlanFilter {
        tags: BTreeMap::from([("team".to_string(), "storage".to_string())]),
        ..Default::default()
    };
    assert!(by_tag.matches(&plan));
}
