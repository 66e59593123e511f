//! Live tests against the Gemini API.
//!
//! These tests need `GEMINI_API_KEY` (a `.env` file works) and network access,
//! so they are ignored by default:
//!   cargo test -p gemini-brain --test live -- --ignored

use campaign_core::{ChatInput, ChatOptions, CreativeEngine, FunctionCall, ProjectParams};
use gemini_brain::GeminiEngine;

fn engine() -> Option<GeminiEngine> {
    let _ = dotenvy::dotenv();
    GeminiEngine::from_env().ok()
}

#[tokio::test]
#[ignore]
async fn test_live_concepts() {
    let Some(engine) = engine() else {
        eprintln!("GEMINI_API_KEY not set, skipping");
        return;
    };

    let mut params = ProjectParams::for_brand("Acme");
    params.product_desc = "A SaaS invoicing tool".to_string();
    params.target_audience = "Small businesses".to_string();

    let concepts = engine.generate_concepts(&params, 2).await.unwrap();
    assert!(!concepts.is_empty());
    assert!(concepts.iter().all(|c| !c.headline.is_empty()));
}

#[tokio::test]
#[ignore]
async fn test_live_chat_function_call() {
    let Some(engine) = engine() else {
        eprintln!("GEMINI_API_KEY not set, skipping");
        return;
    };

    let declaration = campaign_core::FunctionDeclaration {
        name: "list_all_projects".to_string(),
        description: "Get a list of all projects with their basic info.".to_string(),
        parameters: serde_json::json!({"type": "OBJECT", "properties": {}}),
    };
    let mut session = engine
        .start_chat(ChatOptions {
            system_instruction: "Always use tools to answer questions about projects.".to_string(),
            tools: vec![declaration],
        })
        .await
        .unwrap();

    let reply = session
        .send(ChatInput::Text("List all my campaigns".to_string()))
        .await
        .unwrap();
    let calls: Vec<FunctionCall> = reply.tool_calls;
    assert!(calls.iter().any(|c| c.name == "list_all_projects"));
}
