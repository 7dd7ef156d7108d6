//! Tool Outcome Envelopes
//!
//! Parsing of serialized tool-call results into a discriminated variant with
//! three cases: a client action to execute on the host surface, a permission
//! request that must be confirmed by the user, or an opaque payload that the
//! chat UI renders as-is.
//!
//! Discrimination happens once, by structural inspection at this boundary.
//! The wire shapes are a contract with the tool layer and are preserved
//! bit-exact (camelCase field names):
//!
//! ```json
//! {"success":true,"message":"...","clientAction":{"type":"navigate","payload":{"path":"/cases"}}}
//! {"requiresPermission":true,"permissionType":"confirmed","toolName":"deleteCase",
//!  "toolCallId":"tc-1","arguments":{},"description":"Delete case c-1"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreResult;

/// A client action declared inside a tool result.
///
/// The `type` is kept as a string and the payload as raw JSON; typed payload
/// decoding is deferred to the action executor so that an unsupported type
/// surfaces as an execution failure naming the type, not as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientActionCall {
    /// Action discriminator: "navigate", "viewResource", "scrollTo", "refreshPage"
    #[serde(rename = "type")]
    pub kind: String,
    /// Action-specific payload, decoded by the executor
    #[serde(default)]
    pub payload: Value,
}

impl ClientActionCall {
    /// Construct an action call from a kind and payload.
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Envelope around a tool result that carries a client action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientActionEnvelope {
    /// Whether the tool itself reported success
    pub success: bool,
    /// Human-readable summary rendered in the transcript
    #[serde(default)]
    pub message: String,
    /// The action to execute on the host surface
    pub client_action: ClientActionCall,
}

/// A tool result announcing that the invoked capability requires explicit
/// user confirmation before it may run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    /// Always `true` on the wire; the discriminator for this envelope
    pub requires_permission: bool,
    /// Confirmation mode; currently always "confirmed"
    pub permission_type: String,
    /// Name of the gated mutating operation
    pub tool_name: String,
    /// Stable id assigned by the tool layer; may be absent on older payloads
    #[serde(default)]
    pub tool_call_id: String,
    /// Arguments the operation will be invoked with once approved
    #[serde(default)]
    pub arguments: Value,
    /// Human-readable description shown on the confirmation card
    #[serde(default)]
    pub description: String,
}

impl PermissionRequest {
    /// Key under which this request is tracked: the wire `toolCallId`, or the
    /// supplied fallback (the tool call's dedup key) when absent.
    pub fn confirmation_key(&self, fallback: &str) -> String {
        if self.tool_call_id.is_empty() {
            fallback.to_string()
        } else {
            self.tool_call_id.clone()
        }
    }
}

/// Discriminated view of a parsed tool result.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Autonomous client action, executed immediately and exactly once
    Action(ClientActionEnvelope),
    /// Gated operation awaiting user confirmation
    Permission(PermissionRequest),
    /// Plain result with no special handling
    Opaque(Value),
}

/// Parse a serialized tool result into its discriminated form.
///
/// An object carrying a `clientAction` field is a client action; an object
/// with `requiresPermission: true` is a permission request; everything else
/// (including `requiresPermission: false`) is opaque. Invalid JSON is an
/// error the caller logs once and never retries.
pub fn parse_tool_outcome(raw: &str) -> CoreResult<ToolOutcome> {
    let value: Value = serde_json::from_str(raw)?;
    if let Some(object) = value.as_object() {
        if object.contains_key("clientAction") {
            let envelope: ClientActionEnvelope = serde_json::from_value(value)?;
            return Ok(ToolOutcome::Action(envelope));
        }
        if object.get("requiresPermission").and_then(Value::as_bool) == Some(true) {
            let request: PermissionRequest = serde_json::from_value(value)?;
            return Ok(ToolOutcome::Permission(request));
        }
    }
    Ok(ToolOutcome::Opaque(value))
}
