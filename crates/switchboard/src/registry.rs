//! Natural-language handler registry.
//!
//! Handlers are registered once during startup through
//! [`RegistryBuilder`] and frozen into an immutable [`Registry`] that the
//! arbiter reads for the rest of the process lifetime. There is no removal
//! and no post-build mutation, which is what makes concurrent reads during
//! dispatch trivially safe.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard::{Candidate, Registration, Registry};
//! use switchboard_core::Permission;
//!
//! let registry = Registry::builder()
//!     .with(
//!         Registration::new(|session| async move {
//!             Ok(Some(Candidate::new(80.0, "weather", serde_json::json!({}))))
//!         })
//!         .keywords(["weather"])
//!         .permission(Permission::Member),
//!     )
//!     .build();
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use switchboard_core::{MessageSession, Permission};

// ============================================================================
// Candidate
// ============================================================================

/// A handler's scored proposal for interpreting a message as a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Certainty score; higher is more certain, on a scale of at least
    /// 0–100.
    pub confidence: f64,
    /// Command name to hand to the executor.
    pub command: String,
    /// Command arguments.
    pub args: Value,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(confidence: f64, command: impl Into<String>, args: Value) -> Self {
        Self {
            confidence,
            command: command.into(),
            args,
        }
    }
}

// ============================================================================
// Handler type
// ============================================================================

/// A boxed natural-language handler.
///
/// Takes a shared message session and produces either a scored
/// [`Candidate`] or no opinion. An `Err` counts as no opinion at the
/// arbiter (logged, never fatal to the dispatch).
pub type NlHandler = Arc<
    dyn Fn(Arc<MessageSession>) -> BoxFuture<'static, anyhow::Result<Option<Candidate>>>
        + Send
        + Sync,
>;

// ============================================================================
// Registration
// ============================================================================

/// One handler plus its eligibility filters, immutable once built.
///
/// Defaults: no keyword filter (always eligible on that axis), no
/// permission requirement, and addressed-only — a handler speaks up only
/// when the message was directed at the bot unless it opts out.
#[derive(Clone)]
pub struct Registration {
    pub(crate) handler: NlHandler,
    pub(crate) keywords: Option<Vec<String>>,
    pub(crate) permission: Permission,
    pub(crate) require_addressed: bool,
}

impl Registration {
    /// Wraps an async function as a registration with default filters.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Arc<MessageSession>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<Candidate>>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |session| Box::pin(handler(session))),
            keywords: None,
            permission: Permission::Everyone,
            require_addressed: true,
        }
    }

    /// Restricts eligibility to messages whose normalized text contains at
    /// least one of the given keywords.
    ///
    /// An empty keyword set is the "always eligible" sentinel, equivalent
    /// to not setting keywords at all.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        self.keywords = (!keywords.is_empty()).then_some(keywords);
        self
    }

    /// Sets the permission level the sender must hold.
    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// Sets whether the handler only fires on messages addressed to the
    /// bot (default `true`).
    pub fn require_addressed(mut self, require: bool) -> Self {
        self.require_addressed = require;
        self
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("keywords", &self.keywords)
            .field("permission", &self.permission)
            .field("require_addressed", &self.require_addressed)
            .finish()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The frozen set of registered handlers.
///
/// Entries keep their registration order; the arbiter uses that order as
/// the stable tie-break among equal-confidence candidates. Registering the
/// same closure twice yields two independent entries.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Arc<[Registration]>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("handler_count", &self.entries.len())
            .finish()
    }
}

/// Builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Registration>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registration.
    pub fn add(&mut self, registration: Registration) {
        self.entries.push(registration);
    }

    /// Adds a registration (builder pattern).
    pub fn with(mut self, registration: Registration) -> Self {
        self.entries.push(registration);
        self
    }

    /// Freezes the builder into an immutable registry.
    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Registration {
        Registration::new(|_session| async { Ok(None) })
    }

    #[test]
    fn empty_keywords_are_always_eligible_sentinel() {
        let reg = noop().keywords(Vec::<String>::new());
        assert!(reg.keywords.is_none());

        let reg = noop().keywords(["hi"]);
        assert_eq!(reg.keywords.as_deref(), Some(&["hi".to_string()][..]));
    }

    #[test]
    fn defaults_match_registration_contract() {
        let reg = noop();
        assert!(reg.keywords.is_none());
        assert_eq!(reg.permission, Permission::Everyone);
        assert!(reg.require_addressed);
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = Registry::builder()
            .with(noop().keywords(["first"]))
            .with(noop().keywords(["second"]))
            .build();

        let keywords: Vec<_> = registry
            .iter()
            .map(|reg| reg.keywords.clone().unwrap())
            .collect();
        assert_eq!(keywords, vec![vec!["first"], vec!["second"]]);
    }

    #[test]
    fn duplicate_handlers_are_independent_entries() {
        let reg = noop();
        let registry = Registry::builder().with(reg.clone()).with(reg).build();
        assert_eq!(registry.len(), 2);
    }
}
