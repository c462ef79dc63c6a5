//! Engine configuration loaded from JSON.
//!
//! ```json
//! {
//!   "conflicts": { "non_blocking_statuses": ["cancelled"] },
//!   "validation": { "require_operator": true, "past_start": "create_only" }
//! }
//! ```
//!
//! Every section and key is optional; missing ones take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictPolicy;
use crate::error::{BookingError, Result};
use crate::validation::ValidationPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub conflicts: ConflictPolicy,
    pub validation: ValidationPolicy,
}

impl EngineConfig {
    /// # Errors
    /// Returns `BookingError::Config` if the JSON is malformed or has unknown values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BookingError::Config(e.to_string()))
    }

    /// # Errors
    /// Returns `BookingError::Io` if the file cannot be read, or
    /// `BookingError::Config` if its contents do not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| BookingError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }
}
