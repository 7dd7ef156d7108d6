//! Confirmation Registry
//!
//! Keyed store of in-flight permission requests. Each gated tool call gets
//! exactly one [`Confirmation`] whose lifecycle runs one-directionally:
//! `pending → approved|denied`, then for approved calls
//! `executing → completed|failed`. The registry owns the only mutable
//! confirmation state in the engine; callers receive cloned snapshots.
//!
//! The mutation capability is invoked exactly once per confirmation, only by
//! [`ConfirmationService::approve`], guarded by the status field: approving a
//! confirmation that is not pending is a no-op, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use casedesk_core::{MutationRunner, PermissionRequest, ResultStore};

/// Lifecycle state of a tracked confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    /// Awaiting a user decision
    Pending,
    /// Accepted by the user; execution about to start
    Approved,
    /// Rejected by the user; the operation never runs
    Denied,
    /// The mutating operation is running
    Executing,
    /// The operation finished successfully
    Completed,
    /// The operation finished with an error
    Failed,
}

/// The tracked lifecycle object for one permission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    /// Tracking key: the wire `toolCallId`, or the tool call's dedup key
    pub key: String,
    /// Name of the gated mutating operation
    pub tool_name: String,
    /// Human-readable description for the confirmation card
    pub description: String,
    /// Arguments the operation will be invoked with
    pub arguments: Value,
    /// Current lifecycle state
    pub status: ConfirmationStatus,
    /// Operation result, recorded when `completed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure description, recorded when `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of an approval, returned as an explicit value for the caller to
/// relay into the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// The operation ran and succeeded
    Executed {
        key: String,
        tool_name: String,
        result: Value,
    },
    /// The operation ran and failed
    Failed {
        key: String,
        tool_name: String,
        error: String,
    },
    /// The key was unknown or the confirmation was not pending; nothing ran
    Skipped,
}

/// Identity of a denied confirmation, for relaying into the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeniedConfirmation {
    pub key: String,
    pub tool_name: String,
}

/// Keyed store of confirmations plus the capabilities used to execute and
/// optionally persist approved operations.
///
/// Thread-safe: the map lives behind a tokio `RwLock`, which is never held
/// across a capability await.
pub struct ConfirmationService {
    confirmations: RwLock<HashMap<String, Confirmation>>,
    runner: Arc<dyn MutationRunner>,
    store: Option<Arc<dyn ResultStore>>,
}

impl ConfirmationService {
    /// Create a registry over the host's mutation capability.
    pub fn new(runner: Arc<dyn MutationRunner>) -> Self {
        Self {
            confirmations: RwLock::new(HashMap::new()),
            runner,
            store: None,
        }
    }

    /// Attach an optional result store for reload resilience.
    pub fn with_result_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a permission request under `key` with status `pending`.
    ///
    /// Idempotent: if a confirmation for `key` already exists (whatever its
    /// status), this is a no-op. Returns whether a new entry was inserted.
    pub async fn register(&self, key: &str, request: &PermissionRequest) -> bool {
        let mut map = self.confirmations.write().await;
        if map.contains_key(key) {
            tracing::debug!(key, "confirmation already registered");
            return false;
        }
        map.insert(
            key.to_string(),
            Confirmation {
                key: key.to_string(),
                tool_name: request.tool_name.clone(),
                description: request.description.clone(),
                arguments: request.arguments.clone(),
                status: ConfirmationStatus::Pending,
                result: None,
                error: None,
            },
        );
        true
    }

    /// Whether a pending confirmation exists for `key`.
    pub async fn has_pending(&self, key: &str) -> bool {
        let map = self.confirmations.read().await;
        map.get(key)
            .map(|c| c.status == ConfirmationStatus::Pending)
            .unwrap_or(false)
    }

    /// Look up a confirmation by key (cloned snapshot).
    pub async fn get(&self, key: &str) -> Option<Confirmation> {
        let map = self.confirmations.read().await;
        map.get(key).cloned()
    }

    /// Cloned snapshot of every tracked confirmation, ordered by key.
    pub async fn snapshot(&self) -> Vec<Confirmation> {
        let map = self.confirmations.read().await;
        let mut all: Vec<Confirmation> = map.values().cloned().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all
    }

    /// Number of tracked confirmations, any status.
    pub async fn len(&self) -> usize {
        self.confirmations.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.confirmations.read().await.is_empty()
    }

    /// Approve a pending confirmation and run its operation.
    ///
    /// Transitions `pending → approved → executing`, invokes the mutation
    /// with the stored arguments, then records `completed` or `failed`. The
    /// status guard makes a second approval (or an approval after denial) a
    /// no-op, so the operation can never run twice.
    pub async fn approve(&self, key: &str) -> ApprovalOutcome {
        let (tool_name, arguments) = {
            let mut map = self.confirmations.write().await;
            match map.get_mut(key) {
                Some(c) if c.status == ConfirmationStatus::Pending => {
                    c.status = ConfirmationStatus::Approved;
                    (c.tool_name.clone(), c.arguments.clone())
                }
                Some(c) => {
                    tracing::debug!(key, status = ?c.status, "approve skipped: not pending");
                    return ApprovalOutcome::Skipped;
                }
                None => {
                    tracing::debug!(key, "approve skipped: unknown confirmation");
                    return ApprovalOutcome::Skipped;
                }
            }
        };

        {
            let mut map = self.confirmations.write().await;
            if let Some(c) = map.get_mut(key) {
                c.status = ConfirmationStatus::Executing;
            }
        }

        match self.runner.invoke(&tool_name, &arguments).await {
            Ok(result) => {
                {
                    let mut map = self.confirmations.write().await;
                    if let Some(c) = map.get_mut(key) {
                        c.status = ConfirmationStatus::Completed;
                        c.result = Some(result.clone());
                    }
                }
                self.persist_outcome(key, &tool_name, &result).await;
                ApprovalOutcome::Executed {
                    key: key.to_string(),
                    tool_name,
                    result,
                }
            }
            Err(e) => {
                let error = e.to_string();
                {
                    let mut map = self.confirmations.write().await;
                    if let Some(c) = map.get_mut(key) {
                        c.status = ConfirmationStatus::Failed;
                        c.error = Some(error.clone());
                    }
                }
                ApprovalOutcome::Failed {
                    key: key.to_string(),
                    tool_name,
                    error,
                }
            }
        }
    }

    /// Deny a pending confirmation without invoking the operation.
    ///
    /// Returns the denied call's identity for relaying, or `None` when the
    /// key is unknown or the confirmation is no longer pending.
    pub async fn deny(&self, key: &str) -> Option<DeniedConfirmation> {
        let mut map = self.confirmations.write().await;
        match map.get_mut(key) {
            Some(c) if c.status == ConfirmationStatus::Pending => {
                c.status = ConfirmationStatus::Denied;
                Some(DeniedConfirmation {
                    key: c.key.clone(),
                    tool_name: c.tool_name.clone(),
                })
            }
            _ => None,
        }
    }

    /// Drop every confirmation regardless of status. Conversation reset only.
    pub async fn clear_all(&self) {
        let mut map = self.confirmations.write().await;
        if !map.is_empty() {
            tracing::debug!(count = map.len(), "clearing all confirmations");
        }
        map.clear();
    }

    /// Persistence failure must not mask execution success.
    async fn persist_outcome(&self, key: &str, tool_name: &str, result: &Value) {
        if let Some(store) = &self.store {
            if let Err(e) = store.persist(key, tool_name, result).await {
                tracing::warn!(key, error = %e, "failed to persist confirmation outcome");
            }
        }
    }
}
