//! Convergence polling.
//!
//! [`poll_until`] repeatedly fetches an element and classifies each fetch
//! against a target administrative state, sleeping a fixed interval between
//! attempts, until the element converges, settles in an error state, vanishes,
//! the attempt budget runs out, or the caller cancels.
//!
//! The engine never issues mutating calls and holds no shared state, so any
//! number of polls can run concurrently for different elements.

use std::future::Future;
use std::time::Duration;

use autonomi_core::{is_valid_transition, AdministrativeState, Element};
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};

/// Interval and attempt budget for convergence polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two consecutive fetches.
    pub retry_interval: Duration,
    /// Maximum number of fetches. Must be at least 1.
    pub max_retry: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retry_interval: default_retry_interval(),
            max_retry: default_max_retry(),
        }
    }
}

const fn default_retry_interval() -> Duration {
    Duration::from_secs(30)
}

const fn default_max_retry() -> u32 {
    60
}

impl PollConfig {
    /// Create a poll configuration.
    #[must_use]
    pub const fn new(retry_interval: Duration, max_retry: u32) -> Self {
        Self {
            retry_interval,
            max_retry,
        }
    }

    /// Check that the configuration allows at least one fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPollConfig`] if `max_retry` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_retry == 0 {
            return Err(ClientError::InvalidPollConfig(
                "max_retry must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a fetch revealed about an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<T> {
    /// The element exists in the given representation.
    Present(T),
    /// The element no longer exists.
    Removed,
}

impl<T> Observed<T> {
    /// The element, if it still exists.
    #[must_use]
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(element) => Some(element),
            Self::Removed => None,
        }
    }

    /// Borrow the element, if it still exists.
    #[must_use]
    pub const fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(element) => Some(element),
            Self::Removed => None,
        }
    }

    /// Whether the element was observed as gone.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

impl<T: Element> Observed<T> {
    /// Administrative state of the observation. A removed element reads as `deleted`.
    #[must_use]
    pub fn state(&self) -> AdministrativeState {
        match self {
            Self::Present(element) => element.state(),
            Self::Removed => AdministrativeState::Deleted,
        }
    }
}

/// Classification of a single fetch.
#[derive(Debug)]
pub enum Verdict {
    /// The target state was reached.
    Converged,
    /// The element settled in an error state other than the target.
    Failed,
    /// The element disappeared while a state other than `deleted` was awaited.
    Vanished,
    /// The element is still moving through its lifecycle.
    Pending,
    /// The fetch failed for a reason other than `404 Not Found`.
    Transient(ClientError),
}

/// Classify the result of one fetch against `target`.
///
/// Returns the observation (if the fetch told us anything about the element)
/// and the verdict. A `404` converges only when `target` is `deleted`; while
/// waiting for any other state it means the element vanished.
pub fn classify<T: Element>(
    fetched: Result<T>,
    target: AdministrativeState,
) -> (Option<Observed<T>>, Verdict) {
    match fetched {
        Ok(element) => {
            let state = element.state();
            let verdict = if state == target {
                Verdict::Converged
            } else if state.is_error() {
                Verdict::Failed
            } else {
                Verdict::Pending
            };
            (Some(Observed::Present(element)), verdict)
        }
        Err(err) if err.is_not_found() => {
            if target == AdministrativeState::Deleted {
                (Some(Observed::Removed), Verdict::Converged)
            } else {
                (Some(Observed::Removed), Verdict::Vanished)
            }
        }
        Err(err) => (None, Verdict::Transient(err)),
    }
}

/// Why a poll stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The target state was reached.
    Converged,
    /// The element settled in an error state.
    TerminalState,
    /// The element disappeared while a state other than `deleted` was awaited.
    Vanished,
    /// Every attempt was used without reaching the target.
    Exhausted,
    /// The caller cancelled the wait.
    Cancelled,
}

/// Result of [`poll_until`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<T> {
    /// Observation from the last fetch, `None` if it failed or never ran.
    pub last_observed: Option<Observed<T>>,
    /// Number of fetches performed.
    pub attempts: u32,
    /// Why polling stopped.
    pub stop: StopReason,
}

impl<T> PollOutcome<T> {
    /// Whether the target state was reached.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.stop == StopReason::Converged
    }
}

/// Run `fut` to completion unless `token` fires first.
async fn cancellable<F: Future>(token: Option<&CancellationToken>, fut: F) -> Option<F::Output> {
    match token {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => None,
            output = fut => Some(output),
        },
        None => Some(fut.await),
    }
}

/// Poll `fetch` until the element reaches `target`.
///
/// At most `config.max_retry` fetches are made, one at a time, with
/// `config.retry_interval` between them and no pause after the last one.
/// Polling stops early on convergence, on an error state, when the element
/// vanishes, or when `cancellation` fires during a fetch or a pause.
///
/// Fetch errors other than `404` are logged and retried; `last_observed` is
/// cleared for that attempt.
pub async fn poll_until<T, F, Fut>(
    config: &PollConfig,
    target: AdministrativeState,
    cancellation: Option<&CancellationToken>,
    mut fetch: F,
) -> PollOutcome<T>
where
    T: Element,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0;
    let mut last_observed: Option<Observed<T>> = None;
    let mut previous_state: Option<AdministrativeState> = None;

    let finish = |last_observed, attempts, stop| PollOutcome {
        last_observed,
        attempts,
        stop,
    };

    while attempts < config.max_retry {
        let Some(fetched) = cancellable(cancellation, fetch()).await else {
            tracing::info!(kind = %T::KIND, target = %target, attempts, "Poll cancelled");
            return finish(last_observed, attempts, StopReason::Cancelled);
        };
        attempts += 1;

        let (observed, verdict) = classify(fetched, target);
        if let Some(Observed::Present(element)) = &observed {
            let state = element.state();
            if let Some(previous) = previous_state {
                if !is_valid_transition(previous, state) {
                    tracing::warn!(
                        kind = %T::KIND,
                        id = %element.id(),
                        from = %previous,
                        to = %state,
                        "Unexpected administrative state transition"
                    );
                }
            }
            previous_state = Some(state);
        }
        last_observed = observed;

        match verdict {
            Verdict::Converged => {
                tracing::debug!(kind = %T::KIND, target = %target, attempts, "Converged");
                return finish(last_observed, attempts, StopReason::Converged);
            }
            Verdict::Failed => {
                return finish(last_observed, attempts, StopReason::TerminalState);
            }
            Verdict::Vanished => {
                return finish(last_observed, attempts, StopReason::Vanished);
            }
            Verdict::Pending => {
                tracing::debug!(
                    kind = %T::KIND,
                    target = %target,
                    state = %previous_state.map_or("unknown", AdministrativeState::as_str),
                    attempt = attempts,
                    max_retry = config.max_retry,
                    "Waiting for target state"
                );
            }
            Verdict::Transient(err) => {
                tracing::warn!(
                    kind = %T::KIND,
                    target = %target,
                    attempt = attempts,
                    error = %err,
                    "Fetch failed while polling, retrying"
                );
            }
        }

        if attempts < config.max_retry
            && cancellable(cancellation, tokio::time::sleep(config.retry_interval))
                .await
                .is_none()
        {
            tracing::info!(kind = %T::KIND, target = %target, attempts, "Poll cancelled");
            return finish(last_observed, attempts, StopReason::Cancelled);
        }
    }

    finish(last_observed, attempts, StopReason::Exhausted)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use autonomi_core::{ElementId, ResourceKind, SupportError};
    use parking_lot::Mutex;
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Probe {
        id: ElementId,
        state: AdministrativeState,
    }

    impl Element for Probe {
        const KIND: ResourceKind = ResourceKind::Node;

        fn id(&self) -> ElementId {
            self.id
        }

        fn state(&self) -> AdministrativeState {
            self.state
        }

        fn support_error(&self) -> Option<&SupportError> {
            None
        }
    }

    enum Step {
        State(AdministrativeState),
        Status(u16),
    }

    /// A fetcher replaying `steps`, repeating the last one forever.
    struct Script {
        id: ElementId,
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicU32,
    }

    impl Script {
        fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
            Arc::new(Self {
                id: ElementId::generate(),
                steps: Mutex::new(steps.into_iter().collect()),
                calls: AtomicU32::new(0),
            })
        }

        fn fetch(self: &Arc<Self>) -> impl Future<Output = Result<Probe>> {
            let this = Arc::clone(self);
            async move {
                this.calls.fetch_add(1, Ordering::SeqCst);
                let mut steps = this.steps.lock();
                let step = if steps.len() > 1 {
                    steps.pop_front()
                } else {
                    steps.front().map(|s| match s {
                        Step::State(state) => Step::State(*state),
                        Step::Status(code) => Step::Status(*code),
                    })
                };
                match step {
                    Some(Step::State(state)) => Ok(Probe { id: this.id, state }),
                    Some(Step::Status(status)) => Err(ClientError::Api {
                        status,
                        body: String::new(),
                    }),
                    None => Err(ClientError::Transport("script exhausted".into())),
                }
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    const fn config(max_retry: u32) -> PollConfig {
        PollConfig::new(Duration::from_secs(1), max_retry)
    }

    use AdministrativeState::{
        CreationError, CreationPending, CreationProceed, DeleteProceed, Deleted, Deployed,
    };

    #[test]
    fn default_config() {
        let config = PollConfig::default();
        assert_eq!(config.retry_interval, Duration::from_secs(30));
        assert_eq!(config.max_retry, 60);
        assert!(config.validate().is_ok());
        assert!(matches!(
            PollConfig::new(Duration::ZERO, 0).validate(),
            Err(ClientError::InvalidPollConfig(_))
        ));
    }

    #[test]
    fn classify_verdicts() {
        let id = ElementId::generate();
        let probe = |state| Ok(Probe { id, state });
        let missing = || {
            Err::<Probe, _>(ClientError::Api {
                status: 404,
                body: String::new(),
            })
        };

        assert!(matches!(classify(probe(Deployed), Deployed).1, Verdict::Converged));
        assert!(matches!(classify(probe(CreationError), Deployed).1, Verdict::Failed));
        assert!(matches!(classify(probe(CreationProceed), Deployed).1, Verdict::Pending));
        // An error state that is itself the target converges.
        assert!(matches!(
            classify(probe(CreationError), CreationError).1,
            Verdict::Converged
        ));

        let (observed, verdict) = classify(missing(), Deleted);
        assert!(matches!(verdict, Verdict::Converged));
        assert_eq!(observed, Some(Observed::Removed));

        let (_, verdict) = classify(missing(), Deployed);
        assert!(matches!(verdict, Verdict::Vanished));
        let (_, verdict) = classify(missing(), DeleteProceed);
        assert!(matches!(verdict, Verdict::Vanished));

        let (observed, verdict) = classify::<Probe>(
            Err(ClientError::Api {
                status: 500,
                body: String::new(),
            }),
            Deployed,
        );
        assert!(observed.is_none());
        assert!(matches!(verdict, Verdict::Transient(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn converges_after_pending_with_one_sleep() {
        let script = Script::new([Step::State(CreationPending), Step::State(Deployed)]);
        let start = Instant::now();

        let outcome = poll_until(&config(2), Deployed, None, || script.fetch()).await;

        assert!(outcome.converged());
        assert_eq!(outcome.attempts, 2);
        assert_eq!(script.calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(outcome.last_observed.map(|o| o.state()), Some(Deployed));
    }

    #[tokio::test(start_paused = true)]
    async fn converges_on_kth_fetch_without_further_fetches() {
        let script = Script::new([
            Step::State(CreationPending),
            Step::State(CreationProceed),
            Step::State(CreationProceed),
            Step::State(Deployed),
        ]);
        let start = Instant::now();

        let outcome = poll_until(&config(10), Deployed, None, || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Converged);
        assert_eq!(script.calls(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_never_sleeps() {
        let script = Script::new([Step::State(CreationPending)]);
        let start = Instant::now();

        let outcome = poll_until(&config(1), Deployed, None, || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(script.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(outcome.last_observed.map(|o| o.state()), Some(CreationPending));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_uses_every_attempt() {
        let script = Script::new([Step::State(CreationProceed)]);
        let start = Instant::now();

        let outcome = poll_until(&config(5), Deployed, None, || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(script.calls(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn error_state_stops_immediately() {
        let script = Script::new([Step::State(CreationPending), Step::State(CreationError)]);

        let outcome = poll_until(&config(10), Deployed, None, || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::TerminalState);
        assert_eq!(script.calls(), 2);
        assert_eq!(outcome.last_observed.map(|o| o.state()), Some(CreationError));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_converges_deletion() {
        let script = Script::new([Step::State(DeleteProceed), Step::Status(404)]);

        let outcome = poll_until(&config(5), Deleted, None, || script.fetch()).await;

        assert!(outcome.converged());
        assert_eq!(script.calls(), 2);
        assert_eq!(outcome.last_observed, Some(Observed::Removed));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_while_creating_is_vanished() {
        let script = Script::new([Step::State(CreationPending), Step::Status(404)]);

        let outcome = poll_until(&config(5), Deployed, None, || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Vanished);
        assert_eq!(script.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried_and_clear_observation() {
        let script = Script::new([
            Step::State(CreationPending),
            Step::Status(502),
            Step::State(Deployed),
        ]);

        let outcome = poll_until(&config(5), Deployed, None, || script.fetch()).await;
        assert!(outcome.converged());
        assert_eq!(script.calls(), 3);

        let script = Script::new([Step::State(CreationPending), Step::Status(503)]);
        let outcome = poll_until(&config(3), Deployed, None, || script.fetch()).await;
        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert!(outcome.last_observed.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_sleep_returns_promptly() {
        let script = Script::new([Step::State(CreationPending)]);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            canceller.cancel();
        });
        let start = Instant::now();

        let outcome = poll_until(&config(60), Deployed, Some(&token), || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Cancelled);
        assert_eq!(script.calls(), 2);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_a_hanging_fetch() {
        let started = AtomicU32::new(0);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(700)).await;
            canceller.cancel();
        });
        let start = Instant::now();

        let outcome = poll_until(&config(5), Deployed, Some(&token), || {
            started.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<Result<Probe>>()
        })
        .await;

        assert_eq!(outcome.stop, StopReason::Cancelled);
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.last_observed.is_none());
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_prevents_any_fetch() {
        let script = Script::new([Step::State(Deployed)]);
        let token = CancellationToken::new();
        token.cancel();

        let outcome = poll_until(&config(5), Deployed, Some(&token), || script.fetch()).await;

        assert_eq!(outcome.stop, StopReason::Cancelled);
        assert_eq!(outcome.attempts, 0);
        assert_eq!(script.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_polls_are_independent() {
        let fast = Script::new([Step::State(CreationPending), Step::State(Deployed)]);
        let slow = Script::new([
            Step::State(CreationPending),
            Step::State(CreationProceed),
            Step::State(CreationProceed),
            Step::State(Deployed),
        ]);
        let config = config(10);

        let (a, b) = tokio::join!(
            poll_until(&config, Deployed, None, || fast.fetch()),
            poll_until(&config, Deployed, None, || slow.fetch()),
        );

        assert!(a.converged() && b.converged());
        assert_eq!(fast.calls(), 2);
        assert_eq!(slow.calls(), 4);
    }
}
