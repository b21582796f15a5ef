//! AvailabilityPoller - fetch a report until it is ready or the budget runs out.
//!
//! A fetch that fails or reports "not ready" counts against the attempt
//! budget. Cancellation is advisory: an in-flight fetch is allowed to
//! finish, but its result is discarded and no further attempt is scheduled.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::availability::{PollState, PollStep};
use crate::domain::foundation::{ReportId, ValidationError};
use crate::domain::report::ReportDocument;
use crate::ports::{ReportAvailability, ReportSource};

/// How a poll ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Ready(ReportDocument),
    Exhausted { attempts: u32 },
    Cancelled,
}

/// Owner side of a poll's cancellation guard. Dropping it cancels.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A fresh cancellation pair.
pub fn cancellation() -> (CancelHandle, watch::Receiver<bool>) {
    let (sender, receiver) = watch::channel(false);
    (CancelHandle { sender }, receiver)
}

pub struct AvailabilityPoller {
    source: Arc<dyn ReportSource>,
    template: PollState,
}

impl AvailabilityPoller {
    /// `template` supplies the attempt budget and delay for every run.
    pub fn new(source: Arc<dyn ReportSource>, template: PollState) -> Self {
        Self { source, template }
    }

    pub fn max_attempts(&self) -> u32 {
        self.template.max_attempts()
    }

    /// Polls `id` until ready, exhausted, or cancelled through `cancel`.
    pub async fn run(
        &self,
        id: &ReportId,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<PollOutcome, ValidationError> {
        let mut state = self.template.clone();
        state.start()?;
        tracing::info!(report_id = %id, max_attempts = state.max_attempts(), "Polling for report");

        loop {
            if *cancel.borrow() {
                state.cancel();
                return Ok(PollOutcome::Cancelled);
            }

            let fetched = self.source.fetch(id).await;

            // Result of an attempt that outlived its owner is dropped.
            if *cancel.borrow() {
                state.cancel();
                tracing::debug!(report_id = %id, "Poll cancelled; discarding fetch result");
                return Ok(PollOutcome::Cancelled);
            }

            match fetched {
                Ok(ReportAvailability::Ready(document)) => {
                    state.record_ready()?;
                    tracing::info!(report_id = %id, attempt = state.attempt() + 1, "Report ready");
                    return Ok(PollOutcome::Ready(document));
                }
                Ok(ReportAvailability::NotReady) => {
                    tracing::debug!(report_id = %id, attempt = state.attempt() + 1, "Report not ready");
                }
                Err(err) => {
                    tracing::warn!(
                        report_id = %id,
                        attempt = state.attempt() + 1,
                        error = %err,
                        "Report fetch failed"
                    );
                }
            }

            match state.record_failure()? {
                PollStep::RetryAfter(delay) => {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.changed() => {}
                    }
                }
                PollStep::Exhausted => {
                    tracing::warn!(report_id = %id, attempts = state.attempt(), "Polling exhausted");
                    return Ok(PollOutcome::Exhausted {
                        attempts: state.attempt(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CollaboratorError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Source replaying scripted results, then "not ready" forever.
    #[derive(Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<ReportAvailability, CollaboratorError>>>,
        fetches: AtomicU32,
    }

    impl ScriptedSource {
        fn with(script: Vec<Result<ReportAvailability, CollaboratorError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fetches: AtomicU32::new(0),
            })
        }

        fn fetches(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportSource for ScriptedSource {
        async fn fetch(&self, _id: &ReportId) -> Result<ReportAvailability, CollaboratorError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(ReportAvailability::NotReady))
        }
    }

    fn poller(source: Arc<ScriptedSource>, max_attempts: u32) -> AvailabilityPoller {
        AvailabilityPoller::new(
            source,
            PollState::new(max_attempts, Duration::from_millis(1)).unwrap(),
        )
    }

    fn id() -> ReportId {
        ReportId::new("r1").unwrap()
    }

    fn ready() -> ReportDocument {
        ReportDocument::from_value(json!({"property_details": {"unit_count": 25}})).unwrap()
    }

    #[tokio::test]
    async fn exhausts_after_exactly_max_attempts() {
        let source = ScriptedSource::with(vec![]);
        let (_handle, cancel) = cancellation();

        let outcome = poller(source.clone(), 3).run(&id(), cancel).await.unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { attempts: 3 });
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn failures_count_toward_budget() {
        let source = ScriptedSource::with(vec![
            Err(CollaboratorError::unavailable("report backend", "refused")),
            Ok(ReportAvailability::NotReady),
            Ok(ReportAvailability::Ready(ready())),
        ]);
        let (_handle, cancel) = cancellation();

        let outcome = poller(source.clone(), 3).run(&id(), cancel).await.unwrap();

        assert_eq!(outcome, PollOutcome::Ready(ready()));
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn ready_on_first_attempt_stops_immediately() {
        let source = ScriptedSource::with(vec![Ok(ReportAvailability::Ready(ready()))]);
        let (_handle, cancel) = cancellation();

        let outcome = poller(source.clone(), 30).run(&id(), cancel).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Ready(_)));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn cancelled_before_start_never_fetches() {
        let source = ScriptedSource::with(vec![]);
        let (handle, cancel) = cancellation();
        handle.cancel();

        let outcome = poller(source.clone(), 3).run(&id(), cancel).await.unwrap();

        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn dropping_handle_cancels_pending_retry() {
        let source = ScriptedSource::with(vec![]);
        let poller = AvailabilityPoller::new(
            source.clone(),
            PollState::new(30, Duration::from_secs(3600)).unwrap(),
        );
        let (handle, cancel) = cancellation();

        let run = tokio::spawn(async move { poller.run(&id(), cancel).await });
        while source.fetches() == 0 {
            tokio::task::yield_now().await;
        }
        drop(handle);

        let outcome = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("poll did not stop")
            .unwrap()
            .unwrap();
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(source.fetches(), 1);
    }

    /// Source whose single fetch completes only after the owner cancels.
    struct SlowSource {
        started: tokio::sync::Notify,
        finish: tokio::sync::Notify,
    }

    #[async_trait]
    impl ReportSource for SlowSource {
        async fn fetch(&self, _id: &ReportId) -> Result<ReportAvailability, CollaboratorError> {
            self.started.notify_one();
            self.finish.notified().await;
            Ok(ReportAvailability::Ready(ready()))
        }
    }

    #[tokio::test]
    async fn in_flight_result_is_discarded_after_cancel() {
        let source = Arc::new(SlowSource {
            started: tokio::sync::Notify::new(),
            finish: tokio::sync::Notify::new(),
        });
        let poller = AvailabilityPoller::new(
            source.clone(),
            PollState::new(3, Duration::from_millis(1)).unwrap(),
        );
        let (handle, cancel) = cancellation();

        let run = tokio::spawn(async move { poller.run(&id(), cancel).await });
        source.started.notified().await;
        handle.cancel();
        source.finish.notify_one();

        assert_eq!(run.await.unwrap().unwrap(), PollOutcome::Cancelled);
        assert!(handle.is_cancelled());
    }
}
