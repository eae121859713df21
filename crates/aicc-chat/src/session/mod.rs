//! Conversation session management.
//!
//! A [`ChatSession`] owns the transcript of one conversation, serializes
//! submissions to a [`crate::ChatBackend`] (at most one in flight), holds
//! the step trace of the latest exchange and notifies listeners after
//! every state change.

mod chat;
mod manager;
mod types;


pub use chat::{FALLBACK_ERROR, FALLBACK_SYSTEM_TURN};
pub use manager::ChatSession;
pub use types::{ListenerId, SessionPhase, SessionSnapshot, SkipReason, SubmitOutcome};
