//! Tests for the plan service layer: the generate workflow against scripted
//! completion replies, and listing against in-memory and PostgreSQL stores.

use std::sync::Arc;
use std::time::Duration;

use planwright_core::completion::CompletionError;
use planwright_core::plan::{GenerateError, PersistenceError, PlanService};
use planwright_db::models::TaskItem;
use planwright_test_utils::fakes::{FailingPlanStore, MemoryPlanStore, ScriptedCompletion};
use planwright_test_utils::{create_test_db, drop_test_db};

fn service_with(
    completion: ScriptedCompletion,
    store: Option<Arc<MemoryPlanStore>>,
) -> (PlanService, Arc<ScriptedCompletion>) {
    let completion = Arc::new(completion);
    let service = PlanService::new(
        completion.clone(),
        store.map(|s| s as Arc<dyn planwright_core::plan::PlanStore>),
    );
    (service, completion)
}

const FENCED_REPLY: &str =
    "```json\n[{\"task\":\"Write draft\",\"deadline\":\"Day 1\",\"depends_on\":[]}]\n```";

#[tokio::test]
async fn generates_sanitized_plan_from_fenced_reply() {
    let (service, _) = service_with(ScriptedCompletion::replying(FENCED_REPLY), None);

    let generated = service.generate("write a novel").await.unwrap();

    assert_eq!(generated.goal, "write a novel");
    assert_eq!(
        generated.plan,
        vec![TaskItem {
            id: "task-1".into(),
            description: "Write draft".into(),
            deadline: "Day 1".into(),
            depends_on: vec![],
        }]
    );
}

#[tokio::test]
async fn prompt_contains_goal() {
    let (service, completion) = service_with(ScriptedCompletion::replying("[]"), None);

    service.generate("learn to juggle").await.unwrap();

    let prompts = completion.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Goal: \"learn to juggle\""));
}

#[tokio::test]
async fn empty_goal_is_rejected_before_calling_upstream() {
    let (service, completion) = service_with(ScriptedCompletion::replying("[]"), None);

    let err = service.generate("").await.unwrap_err();

    assert!(matches!(err, GenerateError::InvalidInput));
    assert!(completion.prompts().is_empty());
}

#[tokio::test]
async fn non_json_reply_is_a_format_error_with_raw_text() {
    let (service, _) = service_with(ScriptedCompletion::replying("  not json \n"), None);

    match service.generate("goal").await.unwrap_err() {
        GenerateError::UpstreamFormat { raw } => assert_eq!(raw, "not json"),
        other => panic!("expected UpstreamFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn non_array_json_is_a_format_error() {
    let (service, _) = service_with(
        ScriptedCompletion::replying("```json\n{\"tasks\": []}\n```"),
        None,
    );

    match service.generate("goal").await.unwrap_err() {
        GenerateError::UpstreamFormat { raw } => assert_eq!(raw, "{\"tasks\": []}"),
        other => panic!("expected UpstreamFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_content_falls_back_to_empty_plan() {
    let (service, _) = service_with(ScriptedCompletion::empty(), None);
    let generated = service.generate("goal").await.unwrap();
    assert!(generated.plan.is_empty());

    let (service, _) = service_with(ScriptedCompletion::replying("   "), None);
    let generated = service.generate("goal").await.unwrap();
    assert!(generated.plan.is_empty());
}

#[tokio::test]
async fn upstream_failure_is_propagated() {
    let (service, _) = service_with(ScriptedCompletion::failing(429, "rate limited"), None);

    let err = service.generate("goal").await.unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Upstream(CompletionError::Status { status: 429, .. })
    ));
}

#[tokio::test]
async fn successful_generation_is_persisted() {
    let store = Arc::new(MemoryPlanStore::new());
    let (service, _) = service_with(ScriptedCompletion::replying(FENCED_REPLY), Some(store.clone()));

    let generated = service.generate("write a novel").await.unwrap();

    let stored = store.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].goal, "write a novel");
    assert_eq!(stored[0].items, generated.plan);
}

#[tokio::test]
async fn format_errors_are_not_persisted() {
    let store = Arc::new(MemoryPlanStore::new());
    let (service, _) = service_with(ScriptedCompletion::replying("nope"), Some(store.clone()));

    assert!(service.generate("goal").await.is_err());
    assert!(store.stored().is_empty());
}

#[tokio::test]
async fn storage_failure_does_not_change_the_result() {
    let completion = Arc::new(ScriptedCompletion::replying(FENCED_REPLY));
    let without_store = PlanService::new(completion.clone(), None);
    let with_failing_store = PlanService::new(completion, Some(Arc::new(FailingPlanStore)));

    let expected = without_store.generate("goal").await.unwrap();
    let actual = with_failing_store.generate("goal").await.unwrap();

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn listing_without_store_is_unavailable() {
    let (service, _) = service_with(ScriptedCompletion::replying("[]"), None);
    assert!(!service.has_store());
    assert!(matches!(
        service.list_plans().await.unwrap_err(),
        PersistenceError::Unavailable
    ));
}

#[tokio::test]
async fn listing_failure_is_reported() {
    let service = PlanService::new(
        Arc::new(ScriptedCompletion::replying("[]")),
        Some(Arc::new(FailingPlanStore)),
    );
    assert!(matches!(
        service.list_plans().await.unwrap_err(),
        PersistenceError::Backend(_)
    ));
}

#[tokio::test]
async fn generate_then_list_against_postgres() {
    let (pool, db_name) = create_test_db().await;

    let service = PlanService::new(
        Arc::new(ScriptedCompletion::replying(FENCED_REPLY)),
        Some(Arc::new(pool.clone())),
    );

    service.generate("older goal").await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    service.generate("newer goal").await.unwrap();

    let plans = service.list_plans().await.unwrap();
    let goals: Vec<&str> = plans.iter().map(|p| p.goal.as_str()).collect();
    assert_eq!(goals, ["newer goal", "older goal"]);
    assert_eq!(plans[0].items[0].id, "task-1");

    pool.close().await;
    drop_test_db(&db_name).await;
}
