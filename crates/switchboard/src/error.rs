//! Error types for router construction.

use thiserror::Error;

/// Unrecoverable configuration errors.
///
/// These are the only failures that propagate out of router construction;
/// everything that can go wrong during dispatch is contained at the
/// handler or transport boundary instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured nickname does not compile into a prefix pattern.
    #[error("invalid nickname pattern {pattern:?}: {reason}")]
    InvalidNickname {
        /// The nickname as configured.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },
}
