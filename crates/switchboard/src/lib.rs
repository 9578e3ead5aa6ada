//! # Switchboard
//!
//! An in-process event routing and arbitration layer for inbound chat
//! gateway streams.
//!
//! Inbound events are distributed to zero or more registered handlers;
//! when several natural-language handlers could plausibly answer the same
//! message, their confidence-scored candidates are arbitrated down to a
//! single winner before the command layer is invoked.
//!
//! ```text
//! ┌─────────┐  Event  ┌────────┐  MessageSession  ┌─────────┐  winner
//! │ Gateway │────────▶│ Router │─────────────────▶│ Arbiter │─────────▶ executor
//! └─────────┘         │        │   BusSession     ├─────────┤
//!                     │        │─────────────────▶│   Bus   │─────────▶ subscribers
//!                     └────────┘                  └─────────┘
//! ```
//!
//! - Messages go through the [`Normalizer`] (nickname-prefix detection,
//!   plain-text and image extraction) into the [`Arbiter`], which fans the
//!   message out to every eligible handler concurrently, picks the highest
//!   confidence candidate, and hands it to the command executor once it
//!   clears [`CONFIDENCE_THRESHOLD`].
//! - Notices and requests are routed by dotted path
//!   (`request.friend`, `notice.group_increase.approve`, ...) through the
//!   [`EventBus`] to subscribers in registration order.
//!
//! Both the handler [`Registry`] and the [`EventBus`] are built once at
//! startup and immutable afterwards, which makes concurrent reads during
//! dispatch safe without locks.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchboard::{Candidate, EventBus, Registration, Registry, Router, RouterConfig};
//! use switchboard_core::{Permission, RoleGate};
//!
//! let registry = Registry::builder()
//!     .with(
//!         Registration::new(|session| async move {
//!             if session.text().contains("weather") {
//!                 return Ok(Some(Candidate::new(
//!                     90.0,
//!                     "weather",
//!                     serde_json::json!({ "city": "auto" }),
//!                 )));
//!             }
//!             Ok(None)
//!         })
//!         .keywords(["weather"]),
//!     )
//!     .build();
//!
//! let bus = EventBus::builder()
//!     .subscribe("request.friend", |session| async move {
//!         if let Some(request) = session.as_request() {
//!             request.approve("").await;
//!         }
//!     })
//!     .build();
//!
//! let router = Router::new(
//!     &RouterConfig::default(),
//!     registry,
//!     bus,
//!     Arc::new(RoleGate::default()),
//!     executor,
//! )?;
//! ```

pub mod arbiter;
pub mod bus;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod registry;
pub mod router;

pub use arbiter::{Arbiter, CONFIDENCE_THRESHOLD};
pub use bus::{BusHandler, EventBus, EventBusBuilder};
pub use config::RouterConfig;
pub use error::ConfigError;
pub use normalizer::Normalizer;
pub use registry::{Candidate, NlHandler, Registration, Registry, RegistryBuilder};
pub use router::Router;

// Re-export the foundation types handlers interact with.
pub use switchboard_core::{
    ApiError, ApiResult, BusSession, CommandExecutor, Event, Gateway, MessageBody, MessageEvent,
    MessageSession, NoticeEvent, NoticeSession, Permission, PermissionGate, RequestEvent,
    RequestKind, RequestSession, RoleGate, Segment, Sender, SharedExecutor, SharedGate,
    SharedGateway,
};
