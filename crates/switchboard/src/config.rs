//! Router configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Router`](crate::Router).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Bot nickname used for addressed-to-me prefix detection.
    ///
    /// When set, a message whose leading text matches
    /// `^<nickname>[whitespace/comma]+` is treated as addressed to the bot
    /// and the prefix is stripped. When unset, only the gateway-provided
    /// flag decides.
    #[serde(default)]
    pub nickname: Option<String>,

    /// Per-handler timeout in milliseconds during arbitration.
    ///
    /// A handler that exceeds it contributes no opinion. `0` disables the
    /// timeout entirely, restoring "a hung handler hangs the dispatch".
    #[serde(default = "default_handler_timeout_ms")]
    pub handler_timeout_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            nickname: None,
            handler_timeout_ms: default_handler_timeout_ms(),
        }
    }
}

fn default_handler_timeout_ms() -> u64 {
    30_000
}

impl RouterConfig {
    /// The handler timeout as a duration, if enabled.
    pub fn handler_timeout(&self) -> Option<std::time::Duration> {
        (self.handler_timeout_ms > 0).then(|| std::time::Duration::from_millis(self.handler_timeout_ms))
    }
}
