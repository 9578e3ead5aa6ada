//! Router front door.
//!
//! One [`Router`] sits between the gateway and everything else: message
//! events go through the normalizer into the arbiter, notice and request
//! events go to the bus under their dotted path.

use tracing::{debug, span, Level};

use switchboard_core::{
    BusSession, Event, NoticeSession, RequestSession, SharedExecutor, SharedGate, SharedGateway,
};

use crate::arbiter::Arbiter;
use crate::bus::EventBus;
use crate::config::RouterConfig;
use crate::error::ConfigError;
use crate::normalizer::Normalizer;
use crate::registry::Registry;

/// The routing layer's entry point for inbound events.
pub struct Router {
    normalizer: Normalizer,
    arbiter: Arbiter,
    bus: EventBus,
}

impl Router {
    /// Builds a router from its frozen parts.
    ///
    /// Fails only on unrecoverable configuration (a nickname that does not
    /// compile into a prefix pattern).
    pub fn new(
        config: &RouterConfig,
        registry: Registry,
        bus: EventBus,
        gate: SharedGate,
        executor: SharedExecutor,
    ) -> Result<Self, ConfigError> {
        let normalizer = Normalizer::new(config.nickname.as_deref())?;
        let arbiter =
            Arbiter::new(registry, gate, executor).handler_timeout(config.handler_timeout());
        Ok(Self {
            normalizer,
            arbiter,
            bus,
        })
    }

    /// Routes one inbound event.
    ///
    /// Returns whether the event was handled: for messages, whether a
    /// command hand-off occurred; for notices and requests, whether any
    /// subscriber fired.
    pub async fn handle_event(&self, gateway: SharedGateway, event: Event) -> bool {
        match event {
            Event::Message(message) => {
                let span = span!(Level::DEBUG, "dispatch", user_id = message.user_id);
                let _enter = span.enter();

                let session = self.normalizer.normalize(gateway, message);
                self.arbiter.dispatch(session).await
            }
            Event::Notice(notice) => {
                let path = notice.event_path();
                debug!(path = %path, "routing notice");
                let session = BusSession::Notice(NoticeSession::new(gateway, notice));
                self.bus.emit(&path, session).await
            }
            Event::Request(request) => {
                let path = request.event_path();
                debug!(path = %path, "routing request");
                let session = BusSession::Request(RequestSession::new(gateway, request));
                self.bus.emit(&path, session).await
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("normalizer", &self.normalizer)
            .field("arbiter", &self.arbiter)
            .field("bus", &self.bus)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
