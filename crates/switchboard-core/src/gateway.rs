//! Gateway seam.
//!
//! The routing layer never talks to the chat transport directly; it goes
//! through the [`Gateway`] trait, which exposes exactly the operations the
//! layer needs. Concrete transports (websocket clients, test doubles, ...)
//! implement it elsewhere.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;

/// Handle to the chat transport behind this routing layer.
///
/// Both request-answering calls may fail with a transport error; whether
/// that error is surfaced or swallowed is the caller's policy (see
/// `RequestSession`).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Returns the bot's own identifier on this gateway.
    fn id(&self) -> &str;

    /// Answers a friend add request.
    ///
    /// `remark` is the friend remark to set on approval; ignored on
    /// rejection.
    async fn set_friend_add_request(
        &self,
        flag: &str,
        approve: bool,
        remark: &str,
    ) -> ApiResult<()>;

    /// Answers a group join/invite request.
    ///
    /// `sub_type` distinguishes join ("add") from invite ("invite");
    /// `reason` is shown to the requester on rejection.
    async fn set_group_add_request(
        &self,
        flag: &str,
        sub_type: &str,
        approve: bool,
        reason: &str,
    ) -> ApiResult<()>;
}

/// A shared gateway handle.
pub type SharedGateway = Arc<dyn Gateway>;
