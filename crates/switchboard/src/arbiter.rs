//! Dispatch arbitration.
//!
//! The [`Arbiter`] is the core of the routing layer. For one normalized
//! message it:
//!
//! 1. Filters the registry down to eligible handlers (permission gate,
//!    keyword match, addressed flag — in that order).
//! 2. Launches every eligible handler as an independent task; handlers
//!    never observe each other and have no mutual ordering.
//! 3. Joins the full set into a slot array indexed by registration
//!    position. There is no early exit on a high-confidence result.
//! 4. Picks the first maximum-confidence candidate in slot order and, if
//!    it clears [`CONFIDENCE_THRESHOLD`], hands it to the command
//!    executor.
//!
//! A handler that fails, panics, or times out contributes no opinion; it
//! cannot abort the dispatch for the others.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use switchboard_core::{MessageSession, SharedExecutor, SharedGate};

use crate::registry::{Candidate, Registration, Registry};

/// Minimum winning confidence required for a command hand-off.
///
/// The confidence scale runs at least 0–100; a winner at exactly the
/// threshold is forwarded.
pub const CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Arbitrates one message across all registered handlers.
///
/// All collaborators are injected at construction; the arbiter itself
/// holds no mutable state and can be shared freely.
pub struct Arbiter {
    registry: Registry,
    gate: SharedGate,
    executor: SharedExecutor,
    handler_timeout: Option<Duration>,
}

impl Arbiter {
    /// Creates an arbiter over a frozen registry.
    ///
    /// The per-handler timeout defaults to 30 seconds; see
    /// [`handler_timeout`](Self::handler_timeout).
    pub fn new(registry: Registry, gate: SharedGate, executor: SharedExecutor) -> Self {
        Self {
            registry,
            gate,
            executor,
            handler_timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Sets the per-handler timeout; `None` lets a hung handler hang the
    /// dispatch.
    ///
    /// A timed-out handler is treated as having no opinion.
    pub fn handler_timeout(mut self, limit: Option<Duration>) -> Self {
        self.handler_timeout = limit;
        self
    }

    /// Dispatches one message session through arbitration.
    ///
    /// Returns whether the message was handled, i.e. whether a winning
    /// candidate cleared the threshold and the executor reported a visible
    /// effect. At most one command hand-off results per call.
    pub async fn dispatch(&self, session: MessageSession) -> bool {
        let session = Arc::new(session);

        let mut tasks: Vec<JoinHandle<Option<Candidate>>> = Vec::new();
        for (index, registration) in self.registry.iter().enumerate() {
            if !self.eligible(registration, &session).await {
                trace!(handler = index, "handler not eligible, skipping");
                continue;
            }
            let fut = (registration.handler)(Arc::clone(&session));
            let limit = self.handler_timeout;
            tasks.push(tokio::spawn(async move {
                let outcome = match limit {
                    Some(limit) => match timeout(limit, fut).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            warn!(handler = index, "handler timed out, treating as no opinion");
                            return None;
                        }
                    },
                    None => fut.await,
                };
                match outcome {
                    Ok(opinion) => opinion,
                    Err(err) => {
                        warn!(handler = index, error = %err, "handler failed, treating as no opinion");
                        None
                    }
                }
            }));
        }

        if tasks.is_empty() {
            return false;
        }
        debug!(launched = tasks.len(), "eligible handlers launched");

        // All tasks are already running; joining in registration order
        // yields a slot array with a stable position per handler.
        let mut slots: Vec<Option<Candidate>> = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(opinion) => slots.push(opinion),
                Err(err) => {
                    warn!(error = %err, "handler task aborted, treating as no opinion");
                    slots.push(None);
                }
            }
        }

        // First maximum in slot order: ties go to the earliest-registered
        // handler.
        let winner = slots
            .iter()
            .flatten()
            .filter(|candidate| !candidate.confidence.is_nan())
            .fold(None::<&Candidate>, |best, candidate| match best {
                Some(best) if best.confidence >= candidate.confidence => Some(best),
                _ => Some(candidate),
            });

        if let Some(winner) = winner {
            debug!(
                command = %winner.command,
                confidence = winner.confidence,
                "arbitration winner"
            );
            if winner.confidence >= CONFIDENCE_THRESHOLD {
                return self
                    .executor
                    .call_command(&session, &winner.command, winner.args.clone())
                    .await;
            }
        }
        false
    }

    /// Evaluates the eligibility invariant for one registration.
    ///
    /// The gate check may suspend; the keyword and addressed checks are
    /// local.
    async fn eligible(&self, registration: &Registration, session: &MessageSession) -> bool {
        if !self
            .gate
            .check(session.event(), registration.permission)
            .await
        {
            return false;
        }
        if let Some(keywords) = &registration.keywords
            && !keywords
                .iter()
                .any(|keyword| session.text().contains(keyword.as_str()))
        {
            return false;
        }
        if registration.require_addressed && !session.addressed() {
            return false;
        }
        true
    }
}

impl std::fmt::Debug for Arbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbiter")
            .field("handler_count", &self.registry.len())
            .field("handler_timeout", &self.handler_timeout)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tokio::sync::Notify;

    use switchboard_core::{
        ApiResult, CommandExecutor, Gateway, MessageBody, MessageEvent, Permission,
        PermissionGate, Sender, SharedGateway,
    };

    use super::*;

    struct NullGateway;

    #[async_trait]
    impl Gateway for NullGateway {
        fn id(&self) -> &str {
            "null"
        }

        async fn set_friend_add_request(&self, _: &str, _: bool, _: &str) -> ApiResult<()> {
            Ok(())
        }

        async fn set_group_add_request(&self, _: &str, _: &str, _: bool, _: &str) -> ApiResult<()> {
            Ok(())
        }
    }

    struct AllowAll;

    #[async_trait]
    impl PermissionGate for AllowAll {
        async fn check(&self, _event: &MessageEvent, _required: Permission) -> bool {
            true
        }
    }

    /// Grants every level up to and including the configured one.
    struct MaxLevel(Permission);

    #[async_trait]
    impl PermissionGate for MaxLevel {
        async fn check(&self, _event: &MessageEvent, required: Permission) -> bool {
            required <= self.0
        }
    }

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingExecutor {
        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn call_command(&self, _session: &MessageSession, name: &str, args: Value) -> bool {
            self.calls.lock().unwrap().push((name.to_string(), args));
            true
        }
    }

    fn session(text: &str, to_me: bool) -> MessageSession {
        let gateway: SharedGateway = Arc::new(NullGateway);
        let event = MessageEvent {
            time: 0,
            self_id: 0,
            message_id: 0,
            user_id: 1,
            group_id: None,
            message: MessageBody::new(),
            to_me,
            sender: Sender::default(),
        };
        MessageSession::new(gateway, event, text.to_string(), Vec::new())
    }

    fn opinion(confidence: f64, command: &str) -> Registration {
        let command = command.to_string();
        Registration::new(move |_session| {
            let command = command.clone();
            async move { Ok(Some(Candidate::new(confidence, command, json!(null)))) }
        })
        .require_addressed(false)
    }

    fn arbiter(registry: Registry, executor: Arc<RecordingExecutor>) -> Arbiter {
        Arbiter::new(registry, Arc::new(AllowAll), executor)
    }

    #[tokio::test]
    async fn empty_registry_is_unhandled() {
        let executor = Arc::new(RecordingExecutor::default());
        let arbiter = arbiter(Registry::builder().build(), executor.clone());
        assert!(!arbiter.dispatch(session("hello", false)).await);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn keyword_mismatch_skips_handler() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&invocations);
        let registry = Registry::builder()
            .with(
                Registration::new(move |_session| {
                    count.fetch_add(1, Ordering::SeqCst);
                    async { Ok(Some(Candidate::new(99.0, "never", json!(null)))) }
                })
                .keywords(["weather"])
                .require_addressed(false),
            )
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        let handled = arbiter(registry, executor.clone())
            .dispatch(session("hello there", false))
            .await;

        assert!(!handled);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn unaddressed_message_skips_addressed_only_handler() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&invocations);
        let registry = Registry::builder()
            .with(Registration::new(move |_session| {
                count.fetch_add(1, Ordering::SeqCst);
                async { Ok(Some(Candidate::new(99.0, "never", json!(null)))) }
            }))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        let handled = arbiter(registry, executor.clone())
            .dispatch(session("hello", false))
            .await;

        assert!(!handled);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permission_gate_filters_per_handler() {
        let registry = Registry::builder()
            .with(opinion(90.0, "admin_only").permission(Permission::Admin))
            .with(opinion(70.0, "open"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        let arbiter = Arbiter::new(
            registry,
            Arc::new(MaxLevel(Permission::Member)),
            executor.clone(),
        );

        assert!(arbiter.dispatch(session("hi", false)).await);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "open");
    }

    #[tokio::test]
    async fn highest_confidence_wins() {
        let registry = Registry::builder()
            .with(opinion(55.0, "a"))
            .with(opinion(60.0, "b"))
            .with(opinion(40.0, "c"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "b");
    }

    #[tokio::test]
    async fn below_threshold_is_unhandled() {
        let registry = Registry::builder().with(opinion(59.0, "x")).build();
        let executor = Arc::new(RecordingExecutor::default());
        assert!(!arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn ties_go_to_the_earliest_registration() {
        let registry = Registry::builder()
            .with(opinion(75.0, "first"))
            .with(opinion(75.0, "second"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "first");
    }

    #[tokio::test]
    async fn no_opinion_handlers_are_discarded() {
        let registry = Registry::builder()
            .with(Registration::new(|_session| async { Ok(None) }).require_addressed(false))
            .with(opinion(80.0, "speaks"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "speaks");
    }

    #[tokio::test]
    async fn failing_handler_does_not_abort_dispatch() {
        let registry = Registry::builder()
            .with(
                Registration::new(|_session| async { Err(anyhow::anyhow!("model unavailable")) })
                    .require_addressed(false),
            )
            .with(opinion(80.0, "survivor"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "survivor");
    }

    #[tokio::test]
    async fn panicking_handler_does_not_abort_dispatch() {
        let registry = Registry::builder()
            .with(
                Registration::new(|_session| async { panic!("handler bug") })
                    .require_addressed(false),
            )
            .with(opinion(80.0, "survivor"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "survivor");
    }

    #[tokio::test]
    async fn hung_handler_times_out_as_no_opinion() {
        let registry = Registry::builder()
            .with(
                Registration::new(|_session| async {
                    std::future::pending::<()>().await;
                    unreachable!()
                })
                .require_addressed(false),
            )
            .with(opinion(80.0, "prompt"))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        let arbiter = arbiter(registry, executor.clone())
            .handler_timeout(Some(Duration::from_millis(50)));

        assert!(arbiter.dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "prompt");
    }

    #[tokio::test]
    async fn handlers_run_concurrently() {
        // The first handler blocks until the second one signals; dispatch
        // can only complete if both are in flight at once.
        let gate = Arc::new(Notify::new());
        let waiter = Arc::clone(&gate);
        let signaller = Arc::clone(&gate);

        let registry = Registry::builder()
            .with(
                Registration::new(move |_session| {
                    let waiter = Arc::clone(&waiter);
                    async move {
                        waiter.notified().await;
                        Ok(Some(Candidate::new(90.0, "waiter", json!(null))))
                    }
                })
                .require_addressed(false),
            )
            .with(
                Registration::new(move |_session| {
                    let signaller = Arc::clone(&signaller);
                    async move {
                        signaller.notify_one();
                        Ok(None)
                    }
                })
                .require_addressed(false),
            )
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", false)).await);
        assert_eq!(executor.calls()[0].0, "waiter");
    }

    #[tokio::test]
    async fn addressed_message_reaches_addressed_only_handler() {
        let registry = Registry::builder()
            .with(opinion(80.0, "addressed").require_addressed(true))
            .build();

        let executor = Arc::new(RecordingExecutor::default());
        assert!(arbiter(registry, executor.clone()).dispatch(session("hi", true)).await);
        assert_eq!(executor.calls()[0].0, "addressed");
    }
}
