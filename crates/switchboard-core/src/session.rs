//! Per-event session values.
//!
//! A session wraps one inbound event together with the gateway handle it
//! arrived on, and is what handlers receive. Sessions are created fresh per
//! event and discarded once dispatch completes; concurrent handlers share
//! one session read-only behind an `Arc`.
//!
//! The variants form a small sum type rather than a common base class:
//! message sessions feed the dispatch arbiter, while notice and request
//! sessions travel the event bus as [`BusSession`] and are matched
//! exhaustively by subscribers.

use tracing::{debug, warn};

use crate::event::{MessageEvent, NoticeEvent, RequestEvent, RequestKind};
use crate::gateway::SharedGateway;

// ============================================================================
// MessageSession
// ============================================================================

/// Session for one chat message, carrying the normalizer's derived views.
#[derive(Clone)]
pub struct MessageSession {
    gateway: SharedGateway,
    event: MessageEvent,
    text: String,
    images: Vec<String>,
}

impl MessageSession {
    /// Creates a message session from an already-normalized event.
    ///
    /// `text` and `images` are the normalizer's derived views of
    /// `event.message`; callers other than the normalizer are expected to
    /// pass views consistent with the event.
    pub fn new(
        gateway: SharedGateway,
        event: MessageEvent,
        text: String,
        images: Vec<String>,
    ) -> Self {
        Self {
            gateway,
            event,
            text,
            images,
        }
    }

    /// The gateway this message arrived on.
    pub fn gateway(&self) -> &SharedGateway {
        &self.gateway
    }

    /// The raw message event.
    pub fn event(&self) -> &MessageEvent {
        &self.event
    }

    /// Normalized plain text (nickname prefix stripped, non-text segments
    /// dropped).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Image locators referenced by the message, in order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Whether the message was directed at the bot.
    pub fn addressed(&self) -> bool {
        self.event.to_me
    }
}

impl std::fmt::Debug for MessageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSession")
            .field("user_id", &self.event.user_id)
            .field("text", &self.text)
            .field("images", &self.images.len())
            .field("addressed", &self.event.to_me)
            .finish()
    }
}

// ============================================================================
// NoticeSession
// ============================================================================

/// Session for one social notice.
#[derive(Clone)]
pub struct NoticeSession {
    gateway: SharedGateway,
    event: NoticeEvent,
}

impl NoticeSession {
    /// Creates a notice session.
    pub fn new(gateway: SharedGateway, event: NoticeEvent) -> Self {
        Self { gateway, event }
    }

    /// The gateway this notice arrived on.
    pub fn gateway(&self) -> &SharedGateway {
        &self.gateway
    }

    /// The raw notice event.
    pub fn event(&self) -> &NoticeEvent {
        &self.event
    }
}

impl std::fmt::Debug for NoticeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeSession")
            .field("path", &self.event.event_path())
            .finish()
    }
}

// ============================================================================
// RequestSession
// ============================================================================

/// Session for one friend/group request, with its answer actions.
///
/// `approve` and `reject` are fire-and-forget: a transport failure is
/// logged and swallowed, never surfaced to the subscriber. Each is meant to
/// be called at most once per request; repeated calls are not rejected but
/// have no defined cumulative effect.
#[derive(Clone)]
pub struct RequestSession {
    gateway: SharedGateway,
    event: RequestEvent,
}

impl RequestSession {
    /// Creates a request session.
    pub fn new(gateway: SharedGateway, event: RequestEvent) -> Self {
        Self { gateway, event }
    }

    /// The gateway this request arrived on.
    pub fn gateway(&self) -> &SharedGateway {
        &self.gateway
    }

    /// The raw request event.
    pub fn event(&self) -> &RequestEvent {
        &self.event
    }

    /// Approves the request.
    ///
    /// For friend requests `remark` becomes the new friend's remark; group
    /// approvals take no extra parameters.
    pub async fn approve(&self, remark: &str) {
        let result = match self.event.request_type {
            RequestKind::Friend => {
                self.gateway
                    .set_friend_add_request(&self.event.flag, true, remark)
                    .await
            }
            RequestKind::Group => {
                self.gateway
                    .set_group_add_request(
                        &self.event.flag,
                        self.event.sub_type.as_deref().unwrap_or_default(),
                        true,
                        "",
                    )
                    .await
            }
        };
        match result {
            Ok(()) => debug!(flag = %self.event.flag, "request approved"),
            Err(err) => warn!(flag = %self.event.flag, error = %err, "failed to approve request"),
        }
    }

    /// Rejects the request.
    ///
    /// For group requests `reason` is shown to the requester; friend
    /// rejections take no extra parameters.
    pub async fn reject(&self, reason: &str) {
        let result = match self.event.request_type {
            RequestKind::Friend => {
                self.gateway
                    .set_friend_add_request(&self.event.flag, false, "")
                    .await
            }
            RequestKind::Group => {
                self.gateway
                    .set_group_add_request(
                        &self.event.flag,
                        self.event.sub_type.as_deref().unwrap_or_default(),
                        false,
                        reason,
                    )
                    .await
            }
        };
        match result {
            Ok(()) => debug!(flag = %self.event.flag, "request rejected"),
            Err(err) => warn!(flag = %self.event.flag, error = %err, "failed to reject request"),
        }
    }
}

impl std::fmt::Debug for RequestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSession")
            .field("path", &self.event.event_path())
            .field("flag", &self.event.flag)
            .finish()
    }
}

// ============================================================================
// BusSession
// ============================================================================

/// The session delivered to event-bus subscribers.
#[derive(Debug, Clone)]
pub enum BusSession {
    /// A notice session.
    Notice(NoticeSession),
    /// A request session.
    Request(RequestSession),
}

impl BusSession {
    /// The request session, if this is a request.
    pub fn as_request(&self) -> Option<&RequestSession> {
        match self {
            BusSession::Request(session) => Some(session),
            BusSession::Notice(_) => None,
        }
    }

    /// The notice session, if this is a notice.
    pub fn as_notice(&self) -> Option<&NoticeSession> {
        match self {
            BusSession::Notice(session) => Some(session),
            BusSession::Request(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
