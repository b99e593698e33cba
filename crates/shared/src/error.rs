use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of a persistence service failure response (`{"error": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct SaveFailure {
    pub error: String,
}

impl SaveFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
