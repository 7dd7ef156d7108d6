//! Orchestration Pass Tests
//!
//! Verifies the engine's behavior over a replay-prone streaming message list:
//! exactly-once action execution, idempotent confirmation registration, and
//! the conversation-reset heuristic.

use serde_json::json;

use casedesk_assistant::{ChatMessage, ConnectionStatus, ToolCall};

use crate::support::{
    assistant_with_result, client_action_result, permission_result, plain_conversation, TestHost,
};

#[tokio::test]
async fn test_navigation_fires_exactly_once_across_rerenders() {
    let host = TestHost::new();
    let messages = vec![assistant_with_result(
        "m-1",
        "goToCases",
        &client_action_result("navigate", json!({"path": "/cases"})),
    )];

    // The same message array is observed across four renders.
    for _ in 0..4 {
        host.orchestrator
            .observe(&messages, ConnectionStatus::Ready)
            .await;
    }

    assert_eq!(*host.navigator.pushes.lock().unwrap(), vec!["/cases"]);
}

#[tokio::test]
async fn test_view_resource_routing_variants() {
    let host = TestHost::new();
    let messages = vec![ChatMessage::assistant("m-1", "")
        .with_tool_call(ToolCall::finished(
            "viewCase",
            "{}",
            client_action_result("viewResource", json!({"resourceId": "case-123"})),
        ))
        .with_tool_call(ToolCall::finished(
            "viewCase",
            "{}",
            client_action_result(
                "viewResource",
                json!({"resourceId": "case-123", "section": "edit"}),
            ),
        ))];

    host.orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    assert_eq!(
        *host.navigator.pushes.lock().unwrap(),
        vec!["/resources/case-123", "/resources/case-123/edit"]
    );
}

#[tokio::test]
async fn test_permission_registered_once_across_rerenders() {
    let host = TestHost::new();
    let messages = vec![assistant_with_result(
        "m-1",
        "deleteCase",
        &permission_result("deleteCase", "tc-1", json!({"caseId": "c-9"})),
    )];

    let first = host
        .orchestrator
        .observe(&messages, ConnectionStatus::Streaming)
        .await;
    let second = host
        .orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    assert_eq!(first.registered_confirmations, 1);
    assert_eq!(second.registered_confirmations, 0);
    let registry = host.orchestrator.confirmations();
    assert_eq!(registry.len().await, 1);
    assert!(registry.has_pending("tc-1").await);
}

#[tokio::test]
async fn test_mixed_navigation_and_permission_in_one_pass() {
    let host = TestHost::new();
    let messages = vec![ChatMessage::assistant("m-1", "")
        .with_tool_call(ToolCall::finished(
            "goToCases",
            "{}",
            client_action_result("navigate", json!({"path": "/cases"})),
        ))
        .with_tool_call(ToolCall::finished(
            "deleteCase",
            "{}",
            permission_result("deleteCase", "tc-1", json!({})),
        ))];

    let report = host
        .orchestrator
        .observe(&messages, ConnectionStatus::Streaming)
        .await;

    // Navigation is immediate even while a confirmation is pending.
    assert_eq!(report.processed_calls, 2);
    assert_eq!(report.executed_actions, 1);
    assert_eq!(report.registered_confirmations, 1);
    assert_eq!(*host.navigator.pushes.lock().unwrap(), vec!["/cases"]);
    assert!(host.orchestrator.confirmations().has_pending("tc-1").await);
}

#[tokio::test]
async fn test_large_drop_resets_all_tracking() {
    let host = TestHost::new();

    let mut messages = plain_conversation(10);
    messages.push(assistant_with_result(
        "m-perm",
        "deleteCase",
        &permission_result("deleteCase", "tc-1", json!({})),
    ));
    host.orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;
    assert_eq!(host.orchestrator.confirmations().len().await, 1);

    // The conversation is replaced by a fresh two-message list.
    let fresh = plain_conversation(2);
    let report = host
        .orchestrator
        .observe(&fresh, ConnectionStatus::Ready)
        .await;

    assert!(report.reset);
    assert_eq!(host.orchestrator.confirmations().len().await, 0);
}

#[tokio::test]
async fn test_drop_within_threshold_keeps_state() {
    let host = TestHost::new();

    let mut messages = plain_conversation(10);
    messages.push(assistant_with_result(
        "m-perm",
        "deleteCase",
        &permission_result("deleteCase", "tc-1", json!({})),
    ));
    host.orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    // Drop of exactly 5 (11 -> 6): display trimming, not a new conversation.
    let trimmed = plain_conversation(6);
    let report = host
        .orchestrator
        .observe(&trimmed, ConnectionStatus::Ready)
        .await;

    assert!(!report.reset);
    assert!(host.orchestrator.confirmations().has_pending("tc-1").await);
}

#[tokio::test]
async fn test_reset_during_error_status_still_clears() {
    let host = TestHost::new();

    let mut messages = plain_conversation(10);
    messages.push(assistant_with_result(
        "m-perm",
        "deleteCase",
        &permission_result("deleteCase", "tc-1", json!({})),
    ));
    host.orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    // Length tracking runs even while the stream is in the error status;
    // only classification is suspended.
    let fresh = plain_conversation(2);
    let report = host
        .orchestrator
        .observe(&fresh, ConnectionStatus::Error)
        .await;

    assert!(report.reset);
    assert_eq!(host.orchestrator.confirmations().len().await, 0);
}

#[tokio::test]
async fn test_malformed_result_executes_and_registers_nothing() {
    let host = TestHost::new();
    let messages = vec![assistant_with_result("m-1", "goToCases", "{not valid json")];

    let report = host
        .orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    assert_eq!(report.processed_calls, 1);
    assert_eq!(report.executed_actions, 0);
    assert_eq!(report.registered_confirmations, 0);
    assert!(host.navigator.pushes.lock().unwrap().is_empty());
    assert!(host.orchestrator.confirmations().is_empty().await);
}

#[tokio::test]
async fn test_opaque_results_need_no_special_handling() {
    let host = TestHost::new();
    let messages = vec![assistant_with_result(
        "m-1",
        "listCases",
        r#"{"cases":[{"id":"c-1"},{"id":"c-2"}]}"#,
    )];

    let report = host
        .orchestrator
        .observe(&messages, ConnectionStatus::Ready)
        .await;

    assert_eq!(report.processed_calls, 1);
    assert_eq!(report.executed_actions, 0);
    assert_eq!(report.registered_confirmations, 0);
}

#[tokio::test]
async fn test_empty_message_list_is_a_no_op() {
    let host = TestHost::new();

    let report = host
        .orchestrator
        .observe(&[], ConnectionStatus::Ready)
        .await;

    assert_eq!(report, Default::default());
}

#[tokio::test]
async fn test_refresh_page_action_soft_reloads() {
    let host = TestHost::new();
    let messages = vec![assistant_with_result(
        "m-1",
        "refreshCases",
        &client_action_result("refreshPage", json!({})),
    )];

    for _ in 0..3 {
        host.orchestrator
            .observe(&messages, ConnectionStatus::Ready)
            .await;
    }

    assert_eq!(
        host.navigator
            .refreshes
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}
