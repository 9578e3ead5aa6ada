//! Notice/request event bus.
//!
//! A much simpler dispatcher than the arbiter: notice and request events
//! are routed by their dotted path (`<postType>.<detailType>[.<subType>]`)
//! to the subscribers registered under *exactly* that path. There is no
//! prefix or wildcard matching and no hierarchical fallback: a subscriber
//! on `request.group` never fires for `request.group.invite`, by design.
//!
//! Subscribers for one path run sequentially in registration order, each
//! awaited before the next, so a later subscriber may rely on an earlier
//! one's side effects having completed.
//!
//! Like the registry, the bus is built once during startup and immutable
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, trace};

use switchboard_core::BusSession;

// ============================================================================
// Handler type
// ============================================================================

/// A boxed notice/request subscriber.
pub type BusHandler = Arc<dyn Fn(Arc<BusSession>) -> BoxFuture<'static, ()> + Send + Sync>;

fn into_bus_handler<F, Fut>(handler: F) -> BusHandler
where
    F: Fn(Arc<BusSession>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |session| Box::pin(handler(session)))
}

// ============================================================================
// EventBus
// ============================================================================

/// The frozen subscription table.
#[derive(Clone, Default)]
pub struct EventBus {
    routes: HashMap<String, Vec<BusHandler>>,
}

impl EventBus {
    /// Starts building a bus.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    /// Returns the number of distinct subscribed paths.
    pub fn path_count(&self) -> usize {
        self.routes.len()
    }

    /// Emits a session to every subscriber of exactly `path`.
    ///
    /// Returns whether any subscriber fired.
    pub async fn emit(&self, path: &str, session: BusSession) -> bool {
        let Some(handlers) = self.routes.get(path) else {
            trace!(path, "no subscribers");
            return false;
        };

        debug!(path, subscribers = handlers.len(), "emitting event");
        let session = Arc::new(session);
        for handler in handlers {
            handler(Arc::clone(&session)).await;
        }
        true
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<_> = self.routes.keys().collect();
        paths.sort();
        f.debug_struct("EventBus").field("paths", &paths).finish()
    }
}

/// Builder for [`EventBus`].
#[derive(Default)]
pub struct EventBusBuilder {
    routes: HashMap<String, Vec<BusHandler>>,
}

impl EventBusBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler under one dotted path.
    pub fn subscribe<F, Fut>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<BusSession>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.routes
            .entry(path.into())
            .or_default()
            .push(into_bus_handler(handler));
        self
    }

    /// Subscribes one handler under several paths at once.
    pub fn subscribe_each<I, P, F, Fut>(mut self, paths: I, handler: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
        F: Fn(Arc<BusSession>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler = into_bus_handler(handler);
        for path in paths {
            self.routes
                .entry(path.into())
                .or_default()
                .push(Arc::clone(&handler));
        }
        self
    }

    /// Freezes the builder into an immutable bus.
    pub fn build(self) -> EventBus {
        EventBus {
            routes: self.routes,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
