//! Session outcomes, snapshots, listeners, and the busy guard.

use std::sync::{Arc, Mutex, PoisonError};

use aicc_common::ConversationId;

use crate::types::{AgentStep, Turn};
use crate::usage::UsageTracker;

use super::manager::SessionState;

/// Why a submit was ignored without touching session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Text was empty or whitespace only.
    Blank,
    /// Another request is still outstanding.
    Busy,
}

/// Result of [`super::ChatSession::submit`]. Failures are reported here
/// and in the transcript, never as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Answered { turn_id: u64 },
    Failed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingResponse,
    Errored,
}

/// Render-agnostic copy of everything a chat view needs.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub turns: Vec<Turn>,
    pub conversation_id: Option<ConversationId>,
    pub busy: bool,
    /// Steps of the exchange in progress or most recently completed.
    pub current_steps: Vec<AgentStep>,
    pub error: Option<String>,
    pub usage: UsageTracker,
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.busy {
            SessionPhase::AwaitingResponse
        } else if self.error.is_some() {
            SessionPhase::Errored
        } else {
            SessionPhase::Idle
        }
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

pub(crate) type Listener = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Handle returned by [`super::ChatSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Clears the `busy` flag on drop, so a submit future that is dropped
/// mid-flight does not leave the session locked.
///
/// A submit that runs to completion calls [`BusyGuard::disarm`] inside the
/// same critical section that applies the result, so `busy` is cleared
/// exactly once and never after a later submit has set it again.
pub(crate) struct BusyGuard<'a> {
    state: Option<&'a Mutex<SessionState>>,
}

impl<'a> BusyGuard<'a> {
    /// Caller must already have set `busy` while holding the lock.
    pub(crate) fn armed(state: &'a Mutex<SessionState>) -> Self {
        Self { state: Some(state) }
    }

    /// Clear `busy` through the caller's lock and make the drop a no-op.
    pub(crate) fn disarm(mut self, state: &mut SessionState) {
        state.busy = false;
        self.state = None;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .busy = false;
        }
    }
}
