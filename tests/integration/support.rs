//! Shared Test Capabilities
//!
//! Recording implementations of the host capability traits, plus helpers for
//! building the serialized tool-result envelopes the transport delivers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use casedesk_assistant::{
    ChatMessage, ChatOrchestrator, CoreError, CoreResult, MessageSink, MutationRunner, Navigator,
    ResultStore, ScrollSurface, ToolCall,
};

/// Records every route push and soft refresh.
#[derive(Default)]
pub struct RecordingNavigator {
    pub pushes: Mutex<Vec<String>>,
    pub refreshes: AtomicUsize,
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn push(&self, path: &str) -> CoreResult<()> {
        self.pushes.lock().unwrap().push(path.to_string());
        Ok(())
    }

    async fn refresh(&self) -> CoreResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scroll surface that resolves a fixed set of element ids and records calls.
pub struct RecordingScroller {
    pub element_ids: Vec<String>,
    pub log: Mutex<Vec<String>>,
}

impl RecordingScroller {
    pub fn with_element_ids(ids: &[&str]) -> Self {
        Self {
            element_ids: ids.iter().map(|s| s.to_string()).collect(),
            log: Mutex::new(Vec::new()),
        }
    }
}

impl Default for RecordingScroller {
    fn default() -> Self {
        Self::with_element_ids(&[])
    }
}

#[async_trait]
impl ScrollSurface for RecordingScroller {
    async fn scroll_to_top(&self, _smooth: bool) -> CoreResult<()> {
        self.log.lock().unwrap().push("top".to_string());
        Ok(())
    }

    async fn scroll_to_bottom(&self, _smooth: bool) -> CoreResult<()> {
        self.log.lock().unwrap().push("bottom".to_string());
        Ok(())
    }

    async fn scroll_to_marker(&self, target: &str, _smooth: bool) -> CoreResult<bool> {
        self.log.lock().unwrap().push(format!("marker:{}", target));
        Ok(false)
    }

    async fn scroll_to_element_id(&self, target: &str, _smooth: bool) -> CoreResult<bool> {
        self.log.lock().unwrap().push(format!("id:{}", target));
        Ok(self.element_ids.iter().any(|id| id == target))
    }
}

/// Runs mutations by echoing their name; can be switched to fail.
#[derive(Default)]
pub struct RecordingRunner {
    pub invocations: Mutex<Vec<(String, Value)>>,
    pub fail: AtomicBool,
}

impl RecordingRunner {
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

#[async_trait]
impl MutationRunner for RecordingRunner {
    async fn invoke(&self, tool_name: &str, arguments: &Value) -> CoreResult<Value> {
        self.invocations
            .lock()
            .unwrap()
            .push((tool_name.to_string(), arguments.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::capability("mutation rejected by case service"));
        }
        Ok(json!({"executed": tool_name}))
    }
}

/// Records persisted outcomes.
#[derive(Default)]
pub struct RecordingStore {
    pub persisted: Mutex<Vec<String>>,
}

#[async_trait]
impl ResultStore for RecordingStore {
    async fn persist(
        &self,
        confirmation_key: &str,
        _tool_name: &str,
        _result: &Value,
    ) -> CoreResult<()> {
        self.persisted
            .lock()
            .unwrap()
            .push(confirmation_key.to_string());
        Ok(())
    }
}

/// Records continuation messages sent back into the conversation.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_text(&self, text: &str) -> CoreResult<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Fully wired orchestrator plus handles to every recording capability.
pub struct TestHost {
    pub orchestrator: ChatOrchestrator,
    pub navigator: Arc<RecordingNavigator>,
    pub scroller: Arc<RecordingScroller>,
    pub runner: Arc<RecordingRunner>,
    pub store: Arc<RecordingStore>,
    pub sink: Arc<RecordingSink>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_scroller(RecordingScroller::default())
    }

    pub fn with_scroller(scroller: RecordingScroller) -> Self {
        let navigator = Arc::new(RecordingNavigator::default());
        let scroller = Arc::new(scroller);
        let runner = Arc::new(RecordingRunner::default());
        let store = Arc::new(RecordingStore::default());
        let sink = Arc::new(RecordingSink::default());
        let orchestrator = ChatOrchestrator::builder()
            .navigator(navigator.clone())
            .scroll_surface(scroller.clone())
            .mutation_runner(runner.clone())
            .result_store(store.clone())
            .message_sink(sink.clone())
            .build()
            .expect("all capabilities wired");
        Self {
            orchestrator,
            navigator,
            scroller,
            runner,
            store,
            sink,
        }
    }
}

/// Serialized client-action envelope, exactly as the tool layer emits it.
pub fn client_action_result(kind: &str, payload: Value) -> String {
    json!({
        "success": true,
        "message": "ok",
        "clientAction": {"type": kind, "payload": payload}
    })
    .to_string()
}

/// Serialized permission-request envelope.
pub fn permission_result(tool_name: &str, tool_call_id: &str, arguments: Value) -> String {
    json!({
        "requiresPermission": true,
        "permissionType": "confirmed",
        "toolName": tool_name,
        "toolCallId": tool_call_id,
        "arguments": arguments,
        "description": format!("Confirm {}", tool_name)
    })
    .to_string()
}

/// An assistant message carrying one finished tool call.
pub fn assistant_with_result(id: &str, tool_name: &str, raw_result: &str) -> ChatMessage {
    ChatMessage::assistant(id, "").with_tool_call(ToolCall::finished(tool_name, "{}", raw_result))
}

/// A conversation of `n` plain messages alternating user/assistant.
pub fn plain_conversation(n: usize) -> Vec<ChatMessage> {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                ChatMessage::user(format!("m-{}", i), "question")
            } else {
                ChatMessage::assistant(format!("m-{}", i), "answer")
            }
        })
        .collect()
}
