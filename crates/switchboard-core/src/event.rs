//! Inbound event model.
//!
//! The gateway delivers every inbound event as a mapping with a `post_type`
//! discriminator. This module models that boundary shape as a tagged union
//! so routing code can match on it exhaustively:
//!
//! ```text
//! Event (post_type dispatch)
//! ├── Message(MessageEvent)   — chat message, carries segments + to_me
//! ├── Notice(NoticeEvent)     — social notice, routed by dotted path
//! └── Request(RequestEvent)   — friend/group request, approve/reject-able
//! ```

use serde::{Deserialize, Serialize};

use crate::message::MessageBody;

// ============================================================================
// Event — post_type dispatch
// ============================================================================

/// An inbound gateway event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "post_type", rename_all = "snake_case")]
pub enum Event {
    /// A chat message.
    Message(MessageEvent),
    /// A social notice (membership change, recall, ...).
    Notice(NoticeEvent),
    /// A friend or group join request.
    Request(RequestEvent),
}

// ============================================================================
// MessageEvent
// ============================================================================

/// Message sender information, as far as the gateway reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Group role ("owner", "admin", "member"), when in a group context.
    #[serde(default)]
    pub role: Option<String>,
}

/// A chat message event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Event timestamp (seconds).
    #[serde(default)]
    pub time: i64,
    /// Receiving bot's own ID.
    #[serde(default)]
    pub self_id: i64,
    /// Message ID.
    #[serde(default)]
    pub message_id: i64,
    /// Sender's user ID.
    pub user_id: i64,
    /// Group ID, for group messages.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Message content as ordered segments.
    pub message: MessageBody,
    /// Whether the message was directed at the bot.
    ///
    /// The gateway may set this (e.g. on @mention); the normalizer also
    /// sets it when it detects a leading nickname prefix.
    #[serde(default)]
    pub to_me: bool,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
}

impl MessageEvent {
    /// Returns true if this message was sent in a group.
    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }
}

// ============================================================================
// NoticeEvent
// ============================================================================

/// A social notice event.
///
/// The detail type stays a plain string: the bus routes notices by their
/// dotted path, so there is no closed set to enumerate here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeEvent {
    /// Event timestamp (seconds).
    #[serde(default)]
    pub time: i64,
    /// Receiving bot's own ID.
    #[serde(default)]
    pub self_id: i64,
    /// Notice detail type ("group_increase", "friend_add", ...).
    pub notice_type: String,
    /// Optional sub-type ("approve", "invite", ...).
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Affected user ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Group ID, for group notices.
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl NoticeEvent {
    /// Builds the dotted subscription path for this notice.
    ///
    /// `notice.<notice_type>` or `notice.<notice_type>.<sub_type>`; a
    /// missing or empty sub-type yields the two-segment form.
    pub fn event_path(&self) -> String {
        dotted_path("notice", &self.notice_type, self.sub_type.as_deref())
    }
}

// ============================================================================
// RequestEvent
// ============================================================================

/// Request detail type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Friend add request.
    Friend,
    /// Group join/invite request.
    Group,
}

impl RequestKind {
    /// The path segment for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Friend => "friend",
            RequestKind::Group => "group",
        }
    }
}

/// A friend or group join request event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEvent {
    /// Event timestamp (seconds).
    #[serde(default)]
    pub time: i64,
    /// Receiving bot's own ID.
    #[serde(default)]
    pub self_id: i64,
    /// Request detail type.
    pub request_type: RequestKind,
    /// Optional sub-type ("add", "invite" for group requests).
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Requesting user's ID.
    pub user_id: i64,
    /// Group ID, for group requests.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Verification message attached by the requester.
    #[serde(default)]
    pub comment: String,
    /// Opaque token the transport requires to answer this request.
    pub flag: String,
}

impl RequestEvent {
    /// Builds the dotted subscription path for this request.
    pub fn event_path(&self) -> String {
        dotted_path("request", self.request_type.as_str(), self.sub_type.as_deref())
    }
}

fn dotted_path(post_type: &str, detail_type: &str, sub_type: Option<&str>) -> String {
    match sub_type {
        Some(sub) if !sub.is_empty() => format!("{post_type}.{detail_type}.{sub}"),
        _ => format!("{post_type}.{detail_type}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
