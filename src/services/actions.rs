//! Client Action Execution
//!
//! Executes the autonomous client actions declared inside tool results:
//! route changes, resource views, scrolling, and soft data refreshes. Actions
//! are side-effect-free from the case domain's point of view, so they run
//! immediately and without confirmation.
//!
//! Payload decoding happens here, per action type, so an unsupported type or
//! a malformed payload becomes a typed failure result. The executor never
//! panics and never returns an error: every outcome, including capability
//! failures, is an [`ActionResult`] value.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use casedesk_core::{ClientActionCall, Navigator, ScrollSurface};

/// Failure text used when the before-hook vetoes an action.
const CANCELLED_BY_HOST: &str = "Action cancelled by host";

// ============================================================================
// Action Payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct NavigatePayload {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewResourcePayload {
    resource_id: String,
    #[serde(default)]
    section: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScrollToPayload {
    target: String,
    #[serde(default)]
    smooth: bool,
}

/// Derive the route for a resource view.
///
/// `section == "edit"` and `section == "timeline"` map to sub-routes; any
/// other (or absent) section lands on the resource's main page.
fn resource_route(payload: &ViewResourcePayload) -> String {
    match payload.section.as_deref() {
        Some("edit") => format!("/resources/{}/edit", payload.resource_id),
        Some("timeline") => format!("/resources/{}/timeline", payload.resource_id),
        _ => format!("/resources/{}", payload.resource_id),
    }
}

// ============================================================================
// Action Result
// ============================================================================

/// Outcome of a single client action.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ActionResult {
    /// Whether the action's effect was performed
    pub success: bool,
    /// Failure description (if unsuccessful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// Create a successful result
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Create a failure result
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Consulted before each action. Returning `false` cancels the action with a
/// standard cancellation error; no effect is performed.
pub type BeforeActionHook = Box<dyn Fn(&ClientActionCall) -> bool + Send + Sync>;

/// Observes every action outcome, success and failure alike.
pub type AfterActionHook = Box<dyn Fn(&ClientActionCall, &ActionResult) + Send + Sync>;

// ============================================================================
// Action Executor
// ============================================================================

/// Executes client actions through host-supplied navigation and scroll
/// capabilities. Holds no state beyond the current call.
pub struct ActionExecutor {
    navigator: Arc<dyn Navigator>,
    scroller: Arc<dyn ScrollSurface>,
    before_hook: Option<BeforeActionHook>,
    after_hook: Option<AfterActionHook>,
}

impl ActionExecutor {
    /// Create an executor over the host's navigation and scroll capabilities.
    pub fn new(navigator: Arc<dyn Navigator>, scroller: Arc<dyn ScrollSurface>) -> Self {
        Self {
            navigator,
            scroller,
            before_hook: None,
            after_hook: None,
        }
    }

    /// Install a veto hook consulted before every action.
    pub fn with_before_hook(mut self, hook: BeforeActionHook) -> Self {
        self.before_hook = Some(hook);
        self
    }

    /// Install an observer invoked after every action.
    pub fn with_after_hook(mut self, hook: AfterActionHook) -> Self {
        self.after_hook = Some(hook);
        self
    }

    /// Execute one client action, reporting the outcome as a value.
    pub async fn execute_action(&self, call: &ClientActionCall) -> ActionResult {
        if let Some(before) = &self.before_hook {
            if !before(call) {
                let result = ActionResult::err(CANCELLED_BY_HOST);
                self.notify_after(call, &result);
                return result;
            }
        }

        let result = self.dispatch(call).await;
        if !result.success {
            tracing::warn!(
                kind = %call.kind,
                error = result.error.as_deref().unwrap_or(""),
                "client action failed"
            );
        }
        self.notify_after(call, &result);
        result
    }

    /// Execute a list of actions strictly in order, stopping at the first
    /// failure. Returns only the results produced so far.
    pub async fn execute_actions(&self, calls: &[ClientActionCall]) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let result = self.execute_action(call).await;
            let failed = !result.success;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    fn notify_after(&self, call: &ClientActionCall, result: &ActionResult) {
        if let Some(after) = &self.after_hook {
            after(call, result);
        }
    }

    async fn dispatch(&self, call: &ClientActionCall) -> ActionResult {
        match call.kind.as_str() {
            "navigate" => match decode::<NavigatePayload>(call) {
                Ok(payload) => self.push(&payload.path).await,
                Err(failure) => failure,
            },
            "viewResource" => match decode::<ViewResourcePayload>(call) {
                Ok(payload) => self.push(&resource_route(&payload)).await,
                Err(failure) => failure,
            },
            "scrollTo" => match decode::<ScrollToPayload>(call) {
                Ok(payload) => self.scroll(&payload).await,
                Err(failure) => failure,
            },
            "refreshPage" => match self.navigator.refresh().await {
                Ok(()) => ActionResult::ok(),
                Err(e) => ActionResult::err(e.to_string()),
            },
            other => ActionResult::err(format!("Unsupported client action type '{}'", other)),
        }
    }

    async fn push(&self, path: &str) -> ActionResult {
        match self.navigator.push(path).await {
            Ok(()) => ActionResult::ok(),
            Err(e) => ActionResult::err(e.to_string()),
        }
    }

    /// "top" and "bottom" scroll the window; any other target resolves an
    /// element by scroll-target marker first, then by element id.
    async fn scroll(&self, payload: &ScrollToPayload) -> ActionResult {
        let resolved = match payload.target.as_str() {
            "top" => self
                .scroller
                .scroll_to_top(payload.smooth)
                .await
                .map(|()| true),
            "bottom" => self
                .scroller
                .scroll_to_bottom(payload.smooth)
                .await
                .map(|()| true),
            target => match self.scroller.scroll_to_marker(target, payload.smooth).await {
                Ok(true) => Ok(true),
                Ok(false) => {
                    self.scroller
                        .scroll_to_element_id(target, payload.smooth)
                        .await
                }
                Err(e) => Err(e),
            },
        };

        match resolved {
            Ok(true) => ActionResult::ok(),
            Ok(false) => ActionResult::err(format!(
                "No scroll target found for '{}'",
                payload.target
            )),
            Err(e) => ActionResult::err(e.to_string()),
        }
    }
}

fn decode<T: DeserializeOwned>(call: &ClientActionCall) -> Result<T, ActionResult> {
    serde_json::from_value::<T>(call.payload.clone()).map_err(|e| {
        ActionResult::err(format!("Invalid '{}' payload: {}", call.kind, e))
    })
}
