//! ChatSession struct, snapshots, listeners, and clear.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aicc_common::ConversationId;
use tracing::debug;

use crate::types::{AgentStep, Turn};
use crate::usage::UsageTracker;
use crate::ChatBackend;

use super::types::{Listener, ListenerId, SessionSnapshot};

/// Mutable session data. Only touched while holding the session lock.
#[derive(Default)]
pub(crate) struct SessionState {
    pub(crate) turns: Vec<Turn>,
    pub(crate) conversation_id: Option<ConversationId>,
    pub(crate) busy: bool,
    pub(crate) current_steps: Vec<AgentStep>,
    pub(crate) error: Option<String>,
    pub(crate) usage: UsageTracker,
    /// Survives `clear` so ids never repeat within one manager.
    next_turn_id: u64,
}

impl SessionState {
    pub(crate) fn next_turn_id(&mut self) -> u64 {
        self.next_turn_id += 1;
        self.next_turn_id
    }

    pub(crate) fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turns: self.turns.clone(),
            conversation_id: self.conversation_id.clone(),
            busy: self.busy,
            current_steps: self.current_steps.clone(),
            error: self.error.clone(),
            usage: self.usage.clone(),
        }
    }

    fn reset(&mut self) {
        self.turns.clear();
        self.conversation_id = None;
        self.current_steps.clear();
        self.error = None;
        self.usage.reset();
    }
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<SessionState>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener_id: AtomicU64,
}

/// One logical conversation with the agent backend.
///
/// Cloning yields another handle to the same session, so a view can keep
/// reading snapshots while a submit is awaiting the backend.
#[derive(Clone)]
pub struct ChatSession {
    pub(crate) backend: Arc<dyn ChatBackend>,
    pub(crate) shared: Arc<Shared>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::default()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Session that continues an existing server-side conversation.
    pub fn resume(backend: Arc<dyn ChatBackend>, conversation_id: ConversationId) -> Self {
        let session = Self::new(backend);
        session.lock_state().conversation_id = Some(conversation_id);
        session
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_state().to_snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.lock_state().busy
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.lock_state().conversation_id.clone()
    }

    /// Register a listener called after every state transition with the
    /// snapshot taken inside that transition. Listeners run on the caller's
    /// task, outside the session lock.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        let id = ListenerId(self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Reset transcript, conversation id, steps, error and usage.
    ///
    /// Refused while a request is outstanding, since the late response
    /// would land in a conversation that no longer exists. Returns whether
    /// the session was cleared.
    pub fn clear(&self) -> bool {
        let snapshot = {
            let mut state = self.lock_state();
            if state.busy {
                debug!("clear ignored: request in flight");
                return false;
            }
            state.reset();
            state.to_snapshot()
        };
        debug!("session cleared");
        self.notify(&snapshot);
        true
    }

    /// Deliver the snapshot taken by the transition that just happened.
    pub(crate) fn notify(&self, snapshot: &SessionSnapshot) {
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}
