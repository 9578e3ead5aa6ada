//! Permission levels and the permission gate seam.

use async_trait::async_trait;

use crate::event::MessageEvent;

// ============================================================================
// Permission
// ============================================================================

/// An ordered permission level.
///
/// Levels are totally ordered; a sender at level `L` satisfies every
/// requirement at or below `L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Permission {
    /// No requirement; every sender passes.
    #[default]
    Everyone,
    /// Regular group member (or any private-chat sender).
    Member,
    /// Group administrator.
    Admin,
    /// Group owner.
    Owner,
    /// Configured superuser.
    Superuser,
}

// ============================================================================
// PermissionGate
// ============================================================================

/// Decides whether a message's sender satisfies a required level.
///
/// The check may suspend (an implementation may look the sender up over
/// I/O) and must not fail for a well-formed event: an answer it cannot
/// determine is simply `false`.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Returns whether the sender of `event` holds `required` or better.
    async fn check(&self, event: &MessageEvent, required: Permission) -> bool;
}

/// A shared permission gate handle.
pub type SharedGate = std::sync::Arc<dyn PermissionGate>;

// ============================================================================
// RoleGate — stock gate backed by gateway-reported roles
// ============================================================================

/// A permission gate that reads the sender's group role off the event.
///
/// Senders listed in `superusers` hold [`Permission::Superuser`]
/// everywhere; everyone else is leveled by their reported role.
#[derive(Debug, Clone, Default)]
pub struct RoleGate {
    superusers: Vec<i64>,
}

impl RoleGate {
    /// Creates a gate with the given superuser IDs.
    pub fn new(superusers: impl Into<Vec<i64>>) -> Self {
        Self {
            superusers: superusers.into(),
        }
    }

    fn level(&self, event: &MessageEvent) -> Permission {
        if self.superusers.contains(&event.user_id) {
            return Permission::Superuser;
        }
        match event.sender.role.as_deref() {
            Some("owner") => Permission::Owner,
            Some("admin") => Permission::Admin,
            _ => Permission::Member,
        }
    }
}

#[async_trait]
impl PermissionGate for RoleGate {
    async fn check(&self, event: &MessageEvent, required: Permission) -> bool {
        self.level(event) >= required
    }
}

// ============================================================================
// Tests
// ============================================================================
