pub mod errors;
pub mod id;

pub use errors::{CommandCenterError, ConfigError};
pub use id::{new_correlation_id, ConversationId};

pub type Result<T> = std::result::Result<T, CommandCenterError>;
