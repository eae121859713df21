//! Configuration schema types for the command center client.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Fields added in later versions are filled in from defaults when an
//! older file is loaded.

mod api;
mod features;
mod model;
mod system;

pub use api::*;
pub use features::*;
pub use model::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// `environment` stays first so it is written before any table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CommandCenterConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub model: ModelConfig,
    pub features: FeaturesConfig,
    pub logging: LoggingConfig,
}
