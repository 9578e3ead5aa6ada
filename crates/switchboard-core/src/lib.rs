//! # Switchboard Core
//!
//! Foundation types for the Switchboard event routing layer.
//!
//! This crate models the boundary between an external chat gateway and the
//! routing logic in the `switchboard` crate:
//!
//! - **Event model**: the inbound `post_type`-tagged union ([`Event`]) with
//!   its message, notice, and request variants, plus the segment-based
//!   message container ([`MessageBody`], [`Segment`]).
//! - **Sessions**: per-event values handed to handlers
//!   ([`MessageSession`], [`NoticeSession`], [`RequestSession`],
//!   [`BusSession`]), including the fire-and-forget approve/reject actions
//!   on requests.
//! - **Collaborator seams**: the narrow traits the routing layer consumes —
//!   [`Gateway`] (transport), [`PermissionGate`] (eligibility), and
//!   [`CommandExecutor`] (what a winning interpretation is handed to).
//!
//! ```text
//! ┌─────────┐  Event   ┌──────────────┐  winner   ┌─────────────────┐
//! │ Gateway │─────────▶│  switchboard │──────────▶│ CommandExecutor │
//! └─────────┘          │  (routing)   │           └─────────────────┘
//!      ▲               └──────────────┘
//!      └── approve/reject via RequestSession
//! ```

pub mod command;
pub mod error;
pub mod event;
pub mod gateway;
pub mod message;
pub mod permission;
pub mod segment;
pub mod session;

pub use command::{CommandExecutor, SharedExecutor};
pub use error::{ApiError, ApiResult};
pub use event::{Event, MessageEvent, NoticeEvent, RequestEvent, RequestKind, Sender};
pub use gateway::{Gateway, SharedGateway};
pub use message::MessageBody;
pub use permission::{Permission, PermissionGate, RoleGate, SharedGate};
pub use segment::Segment;
pub use session::{BusSession, MessageSession, NoticeSession, RequestSession};
