//! Integration tests for the campaign dispatch table.
//!
//! Every test runs against an in-memory store and the deterministic
//! `StubEngine`, so no network access is needed:
//!   cargo test -p campaign-tools --test dispatch

use std::sync::Arc;
use std::time::Duration;

use campaign_core::{
    AppView, EngineError, ProjectParams, ProjectStage, ProjectStatus, ToolExecutor, ToolRequest,
};
use campaign_store::ProjectStore;
use campaign_tools::{CampaignDispatcher, DispatcherConfig, ToolName, ToolOutcome};
use mock_engine::{DelayedEngine, EngineOp, StubEngine, STUB_IMAGE};
use serde_json::{json, Map, Value};

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn dispatcher(engine: StubEngine) -> CampaignDispatcher {
    CampaignDispatcher::new(ProjectStore::in_memory(), Arc::new(engine))
}

async fn create(dispatcher: &CampaignDispatcher, brand: &str) -> String {
    let outcome = dispatcher
        .dispatch("create_project", args(json!({"brandName": brand})))
        .await;
    assert!(outcome.is_success(), "{}", outcome.message());
    outcome
        .get("projectId")
        .and_then(Value::as_str)
        .unwrap()
        .to_string()
}

/// Create a project with concepts, select the first two, and generate finals.
async fn project_with_ads(dispatcher: &CampaignDispatcher) -> String {
    let id = create(dispatcher, "Acme").await;
    let outcome = dispatcher
        .dispatch("generate_concepts", args(json!({"projectId": id, "count": 3})))
        .await;
    assert!(outcome.is_success());
    for index in [0, 1] {
        let outcome = dispatcher
            .dispatch("select_concept", args(json!({"projectId": id, "conceptIndex": index})))
            .await;
        assert!(outcome.is_success());
    }
    let outcome = dispatcher
        .dispatch("generate_finals", args(json!({"projectId": id})))
        .await;
    assert!(outcome.is_success(), "{}", outcome.message());
    id
}

// ============================================================================
// Validation
// ============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_argument_does_not_mutate() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = create(&dispatcher, "Acme").await;
        let before = dispatcher.store().get(&id).await.unwrap();

        let calls = [
            ("create_project", json!({"industry": "SaaS"})),
            ("generate_concepts", json!({"count": 3})),
            ("select_concept", json!({"projectId": id})),
            ("schedule_campaign", json!({"projectId": id})),
            ("delete_project", json!({})),
        ];
        for (name, call_args) in calls {
            let outcome = dispatcher.dispatch(name, args(call_args)).await;
            assert!(!outcome.is_success(), "{} should fail", name);
            assert!(outcome.message().contains("Missing required parameter"));
        }

        assert_eq!(dispatcher.store().count().await, 1);
        assert_eq!(dispatcher.store().get(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_project_does_not_mutate() {
        let engine = StubEngine::new();
        let dispatcher = dispatcher(engine.clone());
        let id = create(&dispatcher, "Acme").await;
        let before = dispatcher.store().list().await;

        let calls = [
            ("generate_concepts", json!({"projectId": "missing"})),
            ("select_concept", json!({"projectId": "missing", "conceptIndex": 0})),
            ("generate_finals", json!({"projectId": "missing"})),
            ("trigger_all_images", json!({"projectId": "missing"})),
            (
                "schedule_campaign",
                json!({"projectId": "missing", "timestamp": 1735722000000i64}),
            ),
            ("generate_seo_report", json!({"projectId": "missing"})),
            ("get_project_details", json!({"projectId": "missing"})),
            ("delete_project", json!({"projectId": "missing"})),
            ("export_project_data", json!({"projectId": "missing"})),
        ];
        for (name, call_args) in calls {
            let outcome = dispatcher.dispatch(name, args(call_args)).await;
            assert_eq!(outcome.message(), "Project not found: missing", "{}", name);
        }
        let outcome = dispatcher
            .dispatch("open_project", args(json!({"id": "missing"})))
            .await;
        assert!(!outcome.is_success());

        assert_eq!(dispatcher.store().list().await, before);
        assert_eq!(dispatcher.store().selected_project_id().await, Some(id));
        assert_eq!(engine.call_count(EngineOp::Concepts), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let dispatcher = dispatcher(StubEngine::new());
        let outcome = dispatcher.dispatch("launch_rockets", Map::new()).await;
        assert_eq!(
            outcome.to_value(),
            json!({"error": true, "message": "Tool launch_rockets not implemented."})
        );
    }

    #[tokio::test]
    async fn test_concept_index_out_of_range() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = create(&dispatcher, "Acme").await;
        dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id})))
            .await;

        let outcome = dispatcher
            .dispatch("select_concept", args(json!({"projectId": id, "conceptIndex": 9})))
            .await;
        assert_eq!(outcome.message(), "Concept not found: index 9");

        let project = dispatcher.store().get(&id).await.unwrap();
        assert_eq!(project.selected_count(), 0);
    }
}

// ============================================================================
// Campaign lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_project_opens_it() {
        let dispatcher = dispatcher(StubEngine::new());
        let outcome = dispatcher
            .dispatch(
                "create_project",
                args(json!({
                    "brandName": "Acme",
                    "productDesc": "A SaaS tool for invoicing",
                    "targetAudience": "small businesses"
                })),
            )
            .await;
        assert_eq!(outcome.message(), "Created project \"Acme Campaign\" and opened it.");

        let store = dispatcher.store();
        let project = store.active_project().await.unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.params.industry, "General");
        assert_eq!(project.params.target_audience, "small businesses");
        assert_eq!(store.current_view().await, AppView::Project);
    }

    #[tokio::test]
    async fn test_generate_concepts_counts() {
        let dispatcher = dispatcher(StubEngine::new().with_extra_concepts(2));
        let id = create(&dispatcher, "Acme").await;

        let outcome = dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id, "count": 5})))
            .await;
        assert_eq!(outcome.get("count"), Some(&json!(5)));

        let project = dispatcher.store().get(&id).await.unwrap();
        assert_eq!(project.ideation_concepts.len(), 5);
        assert_eq!(project.status, ProjectStatus::Ideation);
        assert_eq!(project.stage, ProjectStage::Ideation);

        let outcome = dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id, "count": 0})))
            .await;
        assert_eq!(outcome.get("count"), Some(&json!(3)));

        let outcome = dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id, "count": 40})))
            .await;
        assert_eq!(outcome.get("count"), Some(&json!(10)));
    }

    #[tokio::test]
    async fn test_generate_finals_requires_selection() {
        let engine = StubEngine::new();
        let dispatcher = dispatcher(engine.clone());
        let id = create(&dispatcher, "Acme").await;
        dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id})))
            .await;

        let outcome = dispatcher
            .dispatch("generate_finals", args(json!({"projectId": id})))
            .await;
        assert_eq!(outcome.message(), "No concepts selected. Use select_concept first.");
        assert_eq!(engine.call_count(EngineOp::FinalAds), 0);
        assert!(dispatcher.store().get(&id).await.unwrap().final_ads.is_empty());
    }

    #[tokio::test]
    async fn test_finals_move_to_production() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = project_with_ads(&dispatcher).await;

        let project = dispatcher.store().get(&id).await.unwrap();
        assert_eq!(project.final_ads.len(), 4);
        assert_eq!(project.stage, ProjectStage::Final);
        assert_eq!(project.status, ProjectStatus::Production);
        assert!(project.final_ads.iter().all(|ad| ad.seo.is_some()));
    }

    #[tokio::test]
    async fn test_schedule_campaign() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = project_with_ads(&dispatcher).await;

        let outcome = dispatcher
            .dispatch(
                "schedule_campaign",
                args(json!({"projectId": id, "timestamp": 1735722000000i64})),
            )
            .await;
        assert_eq!(outcome.message(), "Campaign scheduled.");

        let project = dispatcher.store().get(&id).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
        assert!(project
            .final_ads
            .iter()
            .all(|ad| ad.scheduled_time == Some(1735722000000)));
    }

    #[tokio::test]
    async fn test_seo_report_is_stored() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = project_with_ads(&dispatcher).await;

        let outcome = dispatcher
            .dispatch("generate_seo_report", args(json!({"projectId": id})))
            .await;
        assert_eq!(outcome.message(), "SEO Report generated successfully.");

        let report = dispatcher.store().get(&id).await.unwrap().seo_report.unwrap();
        assert!(report.contains("4 ads reviewed"));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dispatcher = dispatcher(StubEngine::new());
        let first = create(&dispatcher, "Acme").await;
        create(&dispatcher, "Globex").await;

        let outcome = dispatcher.dispatch("list_all_projects", Map::new()).await;
        assert_eq!(outcome.get("count"), Some(&json!(2)));
        let projects = outcome.get("projects").unwrap().as_array().unwrap();
        assert_eq!(projects[0]["name"], "Globex Campaign");
        assert_eq!(projects[1]["brandName"], "Acme");
        assert_eq!(projects[1]["conceptCount"], 0);

        let outcome = dispatcher
            .dispatch("delete_project", args(json!({"projectId": first})))
            .await;
        assert_eq!(outcome.message(), "Deleted project: Acme Campaign");
        assert_eq!(dispatcher.store().count().await, 1);
    }

    #[tokio::test]
    async fn test_engine_failure_is_structured() {
        let engine = StubEngine::new().with_failure(EngineOp::Concepts, EngineError::RateLimited);
        let dispatcher = dispatcher(engine);
        let id = create(&dispatcher, "Acme").await;

        let outcome = dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": id})))
            .await;
        assert!(!outcome.is_success());
        assert!(outcome.message().starts_with("Engine error:"));

        let project = dispatcher.store().get(&id).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(project.ideation_concepts.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_brand_url() {
        let dispatcher = dispatcher(StubEngine::new());
        let outcome = dispatcher
            .dispatch("analyze_brand_url", args(json!({"url": "https://www.acme.io/about"})))
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.get("data").unwrap()["brandName"], "Acme");
        assert_eq!(dispatcher.store().count().await, 0);
    }
}

// ============================================================================
// Image jobs
// ============================================================================

mod image_tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_all_images() {
        let dispatcher = dispatcher(StubEngine::new());
        let id = project_with_ads(&dispatcher).await;

        let outcome = dispatcher
            .dispatch("trigger_all_images", args(json!({"projectId": id})))
            .await;
        assert_eq!(outcome.message(), "Triggered image generation for 4 ads.");

        dispatcher.wait_for_image_jobs().await;
        let project = dispatcher.store().get(&id).await.unwrap();
        for ad in &project.final_ads {
            assert_eq!(ad.image_url.as_deref(), Some(STUB_IMAGE));
            assert!(!ad.is_loading_image);
        }

        let outcome = dispatcher
            .dispatch("trigger_all_images", args(json!({"projectId": id})))
            .await;
        assert_eq!(outcome.get("count"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_failed_image_is_isolated() {
        let engine = StubEngine::new().failing_image_for("variant B concept 1");
        let dispatcher = dispatcher(engine);
        let id = project_with_ads(&dispatcher).await;

        dispatcher
            .dispatch("trigger_all_images", args(json!({"projectId": id})))
            .await;
        dispatcher.wait_for_image_jobs().await;

        let project = dispatcher.store().get(&id).await.unwrap();
        let missing: Vec<_> = project
            .final_ads
            .iter()
            .filter(|ad| ad.image_url.is_none())
            .collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].visual_prompt.contains("variant B concept 1"));
        assert!(project.final_ads.iter().all(|ad| !ad.is_loading_image));
    }

    #[tokio::test]
    async fn test_trigger_returns_before_jobs_finish() {
        let engine = DelayedEngine::with_millis(StubEngine::new(), 200);
        let store = ProjectStore::in_memory();
        let dispatcher = CampaignDispatcher::new(store.clone(), Arc::new(engine));

        // Seed through a fast dispatcher sharing the same store.
        let seeding = CampaignDispatcher::new(store, Arc::new(StubEngine::new()));
        let id = project_with_ads(&seeding).await;

        let outcome = dispatcher
            .dispatch("trigger_all_images", args(json!({"projectId": id})))
            .await;
        assert!(outcome.is_success());

        let project = dispatcher.store().get(&id).await.unwrap();
        assert!(project.final_ads.iter().all(|ad| ad.is_loading_image));
        assert!(dispatcher.pending_image_jobs().await > 0);

        dispatcher.wait_for_image_jobs().await;
        let project = dispatcher.store().get(&id).await.unwrap();
        assert!(project.final_ads.iter().all(|ad| ad.image_url.is_some()));
    }
}

// ============================================================================
// Timeouts, export, executor
// ============================================================================

mod boundary_tests {
    use super::*;

    #[tokio::test]
    async fn test_call_timeout() {
        let store = ProjectStore::in_memory();
        let project = store
            .create("Slow Campaign", ProjectParams::for_brand("Slow"))
            .await
            .unwrap();
        let engine = DelayedEngine::with_millis(StubEngine::new(), 500);
        let config = DispatcherConfig::default().with_call_timeout(Duration::from_millis(50));
        let dispatcher = CampaignDispatcher::with_config(store, Arc::new(engine), config);

        let outcome = dispatcher
            .dispatch("generate_concepts", args(json!({"projectId": project.id})))
            .await;
        assert!(matches!(outcome, ToolOutcome::Failure { .. }));
        assert!(outcome.message().contains("timed out"));
        assert!(dispatcher
            .store()
            .get(&project.id)
            .await
            .unwrap()
            .ideation_concepts
            .is_empty());
    }

    #[tokio::test]
    async fn test_export_reimports() {
        let dir = tempfile::tempdir().unwrap();
        let config = DispatcherConfig::default().with_export_dir(dir.path());
        let dispatcher = CampaignDispatcher::with_config(
            ProjectStore::in_memory(),
            Arc::new(StubEngine::new()),
            config,
        );
        let id = project_with_ads(&dispatcher).await;

        let outcome = dispatcher
            .dispatch("export_project_data", args(json!({"projectId": id})))
            .await;
        assert_eq!(outcome.message(), "Exported project: Acme Campaign");
        let path = outcome.get("path").and_then(Value::as_str).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();

        let fresh = ProjectStore::in_memory();
        let summary = fresh.import_json(&raw).await.unwrap();
        assert_eq!(summary.imported, 1);

        let imported = fresh.get(&id).await.unwrap();
        assert_eq!(imported.name, "Acme Campaign");
        assert_eq!(imported.ideation_concepts.len(), 3);
        assert_eq!(imported.final_ads.len(), 4);
    }

    #[tokio::test]
    async fn test_executor_wraps_outcome() {
        let dispatcher = dispatcher(StubEngine::new());
        assert_eq!(dispatcher.supported_tools().len(), ToolName::ALL.len());
        assert_eq!(dispatcher.declarations().len(), ToolName::ALL.len());

        let result = dispatcher
            .execute(ToolRequest::new("create_project", args(json!({"brandName": "Acme"}))))
            .await;
        assert!(result.success);
        assert_eq!(result.name, "create_project");
        assert_eq!(result.payload["success"], true);

        let result = dispatcher
            .execute(ToolRequest::new("open_project", Map::new()))
            .await;
        assert!(!result.success);
        assert_eq!(result.payload["error"], true);
    }
}
