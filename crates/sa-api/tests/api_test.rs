//! End-to-end tests for the HTTP surface against a scripted agent

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use sa_api::AppState;
use sa_core::{
    AgentReply, AssistantOutput, ConversationAgent, SessionManager, ToolInvocation,
    TurnOrchestrator,
};

/// Agent that replays a scripted list of replies
struct ScriptedAgent {
    replies: Mutex<Vec<sa_core::Result<AgentReply>>>,
}

#[async_trait]
impl ConversationAgent for ScriptedAgent {
    async fn run(&self, _context: &str) -> sa_core::Result<AgentReply> {
        self.replies.lock().unwrap().remove(0)
    }
}

fn app(replies: Vec<sa_core::Result<AgentReply>>) -> (Router, Arc<SessionManager>) {
    let sessions = Arc::new(SessionManager::in_memory().unwrap());
    let agent = Arc::new(ScriptedAgent {
        replies: Mutex::new(replies),
    });
    let orchestrator = Arc::new(TurnOrchestrator::new(Arc::clone(&sessions), agent));

    let state = AppState {
        orchestrator,
        sessions: Arc::clone(&sessions),
    };
    (sa_api::routes::routes().with_state(state), sessions)
}

fn tool_reply(symbol: &str) -> sa_core::Result<AgentReply> {
    Ok(AgentReply::Structured(AssistantOutput {
        explanation: format!("{} looked up", symbol),
        tool_used: Some(ToolInvocation {
            name: "get_price".to_string(),
            args: json!({"symbol": symbol}).as_object().unwrap().clone(),
        }),
        data: Some(json!({"symbol": symbol, "price": 100.0})),
    }))
}

async fn post_ask(router: Router, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (router, _) = app(vec![]);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ask_returns_fresh_session_id() {
    let (router, _) = app(vec![tool_reply("TRG")]);

    let (status, body) = post_ask(router, json!({"question": "Tell me about TRG"})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert_eq!(body["output"]["toolUsed"]["args"]["symbol"], "TRG");
    assert_eq!(body["output"]["data"]["price"], 100.0);
}

#[tokio::test]
async fn test_followup_resolves_symbol_without_repeating_it() {
    let (router, sessions) = app(vec![
        tool_reply("TRG"),
        Ok(AgentReply::Structured(AssistantOutput::explanation_only(
            "TRG trades at 100",
        ))),
    ]);

    let (_, first) = post_ask(router.clone(), json!({"question": "Tell me about TRG"})).await;
    let session_id = first["sessionId"].as_str().unwrap().to_string();

    let (status, second) = post_ask(
        router,
        json!({"question": "what's its price?", "sessionId": session_id}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["sessionId"], first["sessionId"]);

    let session = sessions.get(&session_id).await.unwrap().unwrap();
    assert_eq!(session.active_symbol.as_deref(), Some("TRG"));
}

#[tokio::test]
async fn test_invalid_question_is_400() {
    let (router, _) = app(vec![]);

    let (status, body) = post_ask(router, json!({"question": "hi"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUESTION");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (router, _) = app(vec![]);

    let (status, body) = post_ask(
        router,
        json!({"question": "Tell me about TRG", "sessionId": "made-up"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_agent_failure_is_503() {
    let (router, _) = app(vec![Err(sa_core::Error::Llm("timeout".to_string()))]);

    let (status, body) = post_ask(router, json!({"question": "Tell me about TRG"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "LLM_UNAVAILABLE");
}

#[tokio::test]
async fn test_session_info_and_delete() {
    let (router, _) = app(vec![tool_reply("HBL")]);

    let (_, ask) = post_ask(
        router.clone(),
        json!({"question": "What is the price of HBL?"}),
    )
    .await;
    let session_id = ask["sessionId"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/api/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let info: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(info["activeSymbol"], "HBL");
    assert_eq!(info["referencedSymbols"][0], "HBL");
    assert_eq!(info["messageCount"], 2);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .uri(format!("/api/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
