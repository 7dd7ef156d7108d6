//! Orchestrator Service
//!
//! Consumes the evolving conversation stream and dispatches the tool results
//! attached to the latest assistant message: client actions go to the
//! [`ActionExecutor`] immediately and exactly once, permission requests go to
//! the [`ConfirmationService`] exactly once, everything else is left for the
//! chat UI to render.
//!
//! The host calls [`ChatOrchestrator::observe`] on every message-list or
//! connection-status change; approval and denial outcomes are relayed back
//! into the conversation as short synthetic continuation messages so the
//! agent's context stays in sync with real-world effects. Nothing in this
//! service escapes as a panic or error into the host's render loop.

use std::sync::Arc;

use tokio::sync::Mutex;

use casedesk_core::{
    parse_tool_outcome, ChatMessage, ConnectionStatus, MessageSink, MutationRunner, Navigator,
    ResultStore, ScrollSurface, ToolOutcome,
};

use crate::services::actions::{ActionExecutor, AfterActionHook, BeforeActionHook};
use crate::services::confirmations::{ApprovalOutcome, ConfirmationService};
use crate::services::orchestrator::tracking::ConversationTracker;
use crate::utils::error::{AppError, AppResult};

/// Summary of one observation pass over the conversation stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationReport {
    /// Whether a conversation reset was detected and state cleared
    pub reset: bool,
    /// Tool calls classified during this pass
    pub processed_calls: usize,
    /// Client actions handed to the executor during this pass
    pub executed_actions: usize,
    /// Permission requests newly registered during this pass
    pub registered_confirmations: usize,
}

/// The engine's orchestration core. Assembled via [`ChatOrchestrator::builder`].
pub struct ChatOrchestrator {
    executor: ActionExecutor,
    confirmations: Arc<ConfirmationService>,
    sink: Arc<dyn MessageSink>,
    tracker: Mutex<ConversationTracker>,
}

impl ChatOrchestrator {
    /// Start assembling an orchestrator from host capabilities.
    pub fn builder() -> ChatOrchestratorBuilder {
        ChatOrchestratorBuilder::default()
    }

    /// Shared handle to the confirmation registry, for the presentation layer
    /// to render pending/approved/denied cards from snapshots.
    pub fn confirmations(&self) -> Arc<ConfirmationService> {
        self.confirmations.clone()
    }

    /// Run one orchestration pass over the current message list and status.
    ///
    /// Call on every message-list or connection-status change. The pass:
    /// 1. tracks the list length and clears all state on a conversation reset
    ///    (this runs regardless of status);
    /// 2. does nothing further while the stream is in the terminal `error`
    ///    status;
    /// 3. classifies each tool call attached to the latest assistant message,
    ///    in array order, at most once each.
    pub async fn observe(
        &self,
        messages: &[ChatMessage],
        status: ConnectionStatus,
    ) -> ObservationReport {
        let mut report = ObservationReport::default();
        let mut tracker = self.tracker.lock().await;

        if tracker.observe_message_count(messages.len()) {
            self.confirmations.clear_all().await;
            report.reset = true;
        }

        if status == ConnectionStatus::Error {
            return report;
        }

        let Some(latest) = messages.last() else {
            return report;
        };
        if !latest.is_assistant() {
            return report;
        }

        for (index, call) in latest.tool_calls.iter().enumerate() {
            let key = call.dedup_key(index);
            if tracker.is_processed(&key) {
                continue;
            }
            // Still executing upstream: leave unmarked so the next update
            // revisits it once a result is attached.
            let Some(raw) = call.result.as_deref() else {
                continue;
            };
            tracker.mark_processed(&key);
            report.processed_calls += 1;

            let outcome = match parse_tool_outcome(raw) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "ignoring malformed tool result");
                    continue;
                }
            };

            match outcome {
                ToolOutcome::Action(envelope) => {
                    let action_key = format!("{}:{}", key, envelope.client_action.kind);
                    if tracker.is_action_executed(&action_key) {
                        continue;
                    }
                    tracker.mark_action_executed(&action_key);
                    // Runs for submitted/streaming/ready alike; navigation
                    // must feel instantaneous.
                    self.executor.execute_action(&envelope.client_action).await;
                    report.executed_actions += 1;
                }
                ToolOutcome::Permission(request) => {
                    let confirmation_key = request.confirmation_key(&key);
                    if self
                        .confirmations
                        .register(&confirmation_key, &request)
                        .await
                    {
                        report.registered_confirmations += 1;
                    }
                }
                ToolOutcome::Opaque(_) => {}
            }
        }

        report
    }

    /// Approve a pending confirmation. Pass-through to the registry; the
    /// executed/failed outcome is relayed into the conversation.
    pub async fn approve_confirmation(&self, key: &str) -> ApprovalOutcome {
        let outcome = self.confirmations.approve(key).await;
        match &outcome {
            ApprovalOutcome::Executed {
                key,
                tool_name,
                result,
            } => {
                self.send_continuation(&format!(
                    "The {} action ({}) completed successfully. Result: {}",
                    tool_name, key, result
                ))
                .await;
            }
            ApprovalOutcome::Failed {
                key,
                tool_name,
                error,
            } => {
                self.send_continuation(&format!(
                    "The {} action ({}) failed: {}",
                    tool_name, key, error
                ))
                .await;
            }
            ApprovalOutcome::Skipped => {}
        }
        outcome
    }

    /// Deny a pending confirmation and tell the agent. Returns whether a
    /// confirmation was actually denied.
    pub async fn deny_confirmation(&self, key: &str) -> bool {
        match self.confirmations.deny(key).await {
            Some(denied) => {
                self.send_continuation(&format!(
                    "The user denied the {} action ({}).",
                    denied.tool_name, denied.key
                ))
                .await;
                true
            }
            None => false,
        }
    }

    /// Continuation failures are logged, never propagated.
    async fn send_continuation(&self, text: &str) {
        if let Err(e) = self.sink.send_text(text).await {
            tracing::warn!(error = %e, "failed to send continuation message");
        }
    }
}

/// Builder wiring host capabilities into a [`ChatOrchestrator`].
///
/// Navigator, scroll surface, mutation runner, and message sink are required;
/// the result store and action hooks are optional. Validation happens at
/// build time.
#[derive(Default)]
pub struct ChatOrchestratorBuilder {
    navigator: Option<Arc<dyn Navigator>>,
    scroller: Option<Arc<dyn ScrollSurface>>,
    runner: Option<Arc<dyn MutationRunner>>,
    store: Option<Arc<dyn ResultStore>>,
    sink: Option<Arc<dyn MessageSink>>,
    before_hook: Option<BeforeActionHook>,
    after_hook: Option<AfterActionHook>,
}

impl ChatOrchestratorBuilder {
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn scroll_surface(mut self, scroller: Arc<dyn ScrollSurface>) -> Self {
        self.scroller = Some(scroller);
        self
    }

    pub fn mutation_runner(mut self, runner: Arc<dyn MutationRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn result_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn message_sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn before_action_hook(mut self, hook: BeforeActionHook) -> Self {
        self.before_hook = Some(hook);
        self
    }

    pub fn after_action_hook(mut self, hook: AfterActionHook) -> Self {
        self.after_hook = Some(hook);
        self
    }

    /// Validate the wiring and assemble the orchestrator.
    pub fn build(self) -> AppResult<ChatOrchestrator> {
        let navigator = self
            .navigator
            .ok_or_else(|| AppError::validation("navigator capability is required"))?;
        let scroller = self
            .scroller
            .ok_or_else(|| AppError::validation("scroll surface capability is required"))?;
        let runner = self
            .runner
            .ok_or_else(|| AppError::validation("mutation runner capability is required"))?;
        let sink = self
            .sink
            .ok_or_else(|| AppError::validation("message sink capability is required"))?;

        let mut executor = ActionExecutor::new(navigator, scroller);
        if let Some(hook) = self.before_hook {
            executor = executor.with_before_hook(hook);
        }
        if let Some(hook) = self.after_hook {
            executor = executor.with_after_hook(hook);
        }

        let mut confirmations = ConfirmationService::new(runner);
        if let Some(store) = self.store {
            confirmations = confirmations.with_result_store(store);
        }

        Ok(ChatOrchestrator {
            executor,
            confirmations: Arc::new(confirmations),
            sink,
            tracker: Mutex::new(ConversationTracker::new()),
        })
    }
}
