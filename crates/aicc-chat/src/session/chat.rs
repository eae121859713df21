//! Submitting a message: the only async operation on a session.

use tracing::{debug, error, warn};

use crate::types::{ChatRequest, Turn};
use crate::ChatError;

use super::manager::ChatSession;
use super::types::{BusyGuard, SkipReason, SubmitOutcome};

/// Error-field text when the server gave no usable detail.
pub const FALLBACK_ERROR: &str = "Failed to send message";
/// Transcript text when the server gave no usable detail.
pub const FALLBACK_SYSTEM_TURN: &str = "Failed to communicate with agent.";

impl ChatSession {
    /// Send `text` to the backend and record the exchange.
    ///
    /// Blank text and calls made while a request is outstanding are
    /// ignored and leave the session untouched. Otherwise the user turn is
    /// appended immediately, and on completion either an assistant turn
    /// (success) or a system turn describing the failure is appended.
    /// `agent_hint` selects an agent; `None` lets the backend route.
    pub async fn submit(&self, text: impl Into<String>, agent_hint: Option<&str>) -> SubmitOutcome {
        let text = text.into();
        if text.trim().is_empty() {
            return SubmitOutcome::Skipped(SkipReason::Blank);
        }

        let (request, guard, entered) = {
            let mut state = self.lock_state();
            if state.busy {
                debug!("submit ignored: request already in flight");
                return SubmitOutcome::Skipped(SkipReason::Busy);
            }

            let id = state.next_turn_id();
            state.turns.push(Turn::user(id, text.clone()));
            state.busy = true;
            state.current_steps.clear();
            state.error = None;

            let request = ChatRequest {
                message: text,
                agent_id: agent_hint.map(str::to_string),
                conversation_id: state.conversation_id.clone(),
            };
            (request, BusyGuard::armed(&self.shared.state), state.to_snapshot())
        };
        self.notify(&entered);

        let result = self.backend.send_chat(&request).await;

        let (outcome, completed) = {
            let mut guard_state = self.lock_state();
            let state = &mut *guard_state;
            let outcome = match result {
                Ok(response) => {
                    match &state.conversation_id {
                        None => state.conversation_id = Some(response.conversation_id.clone()),
                        Some(existing) if *existing != response.conversation_id => {
                            warn!(
                                kept = %existing,
                                received = %response.conversation_id,
                                "backend returned a different conversation id; keeping the original"
                            );
                        }
                        Some(_) => {}
                    }

                    state.current_steps = response.steps.clone();
                    state
                        .usage
                        .record(&response.agent_id, response.tokens_used, response.latency_ms);

                    let id = state.next_turn_id();
                    state.turns.push(Turn::assistant(id, &response));
                    SubmitOutcome::Answered { turn_id: id }
                }
                Err(e) => {
                    error!(error = %e, "chat request failed");
                    let (message, system_text) = describe_failure(&e);
                    state.error = Some(message.clone());

                    let id = state.next_turn_id();
                    state.turns.push(Turn::system(id, system_text));
                    SubmitOutcome::Failed { error: message }
                }
            };
            guard.disarm(state);
            (outcome, state.to_snapshot())
        };

        self.notify(&completed);
        outcome
    }
}

/// Error-field message and inline system-turn text for a failure.
fn describe_failure(err: &ChatError) -> (String, String) {
    match err.detail() {
        Some(detail) => (detail.to_string(), format!("Error: {detail}")),
        None => (
            FALLBACK_ERROR.to_string(),
            format!("Error: {FALLBACK_SYSTEM_TURN}"),
        ),
    }
}
