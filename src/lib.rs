//! CaseDesk Assistant - Orchestration Engine
//!
//! This library implements the tool-call execution and permission-confirmation
//! engine that sits between CaseDesk's conversational assistant and the
//! application's mutating operations. It includes:
//! - The orchestrator that classifies tool results on the streaming message list
//! - Immediate execution of autonomous client actions (navigation, scrolling, refresh)
//! - The confirmation registry gating data mutations behind explicit user approval
//! - Continuation messaging that feeds action outcomes back into the conversation
//!
//! The host supplies every outward capability (routing, scrolling, mutations,
//! messaging) through the traits in `casedesk-core`.

pub mod services;
pub mod utils;

// Re-export the engine surface
pub use services::actions::{ActionExecutor, ActionResult, AfterActionHook, BeforeActionHook};
pub use services::confirmations::{
    ApprovalOutcome, Confirmation, ConfirmationService, ConfirmationStatus, DeniedConfirmation,
};
pub use services::orchestrator::{ChatOrchestrator, ChatOrchestratorBuilder, ObservationReport};
pub use utils::error::{AppError, AppResult};

// Re-export the core model for hosts that depend on this crate alone
pub use casedesk_core::{
    parse_tool_outcome, ChatMessage, ClientActionCall, ClientActionEnvelope, ConnectionStatus,
    CoreError, CoreResult, MessageRole, MessageSink, MutationRunner, Navigator, PermissionRequest,
    ResultStore, ScrollSurface, ToolCall, ToolCallState, ToolOutcome,
};
