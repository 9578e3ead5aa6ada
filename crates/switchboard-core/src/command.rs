//! Command execution seam.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::session::MessageSession;

/// The command-execution subsystem invoked on a winning interpretation.
///
/// The arbiter hands the winner's `(name, args)` pair to this trait and
/// relays its answer; what a command actually does is outside the routing
/// layer.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs the named command against the message's session.
    ///
    /// Returns whether the command produced a visible effect.
    async fn call_command(&self, session: &MessageSession, name: &str, args: Value) -> bool;
}

/// A shared command executor handle.
pub type SharedExecutor = Arc<dyn CommandExecutor>;
