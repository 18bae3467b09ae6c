//! Runtime policy knobs.
//!
//! Loading these from a file is the embedding application's job; this
//! struct is the contract it deserializes into.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fail a search when the submitted sequence type is incompatible with
    /// the chosen method. Historically this check was only logged, never
    /// enforced, so the default keeps it relaxed.
    pub enforce_query_type: bool,

    /// Upper bound, in seconds, on one external alignment or retrieval
    /// invocation. `None` means unbounded.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enforce_query_type: false,
            timeout_secs: None,
        }
    }
}
