//! ReportLookupHandler - resolve a report id to a document.
//!
//! Order: reserved sample ids, the document store, a running watch
//! (still processing), an exhausted watch, and finally the backend.

use std::sync::Arc;

use thiserror::Error;

use crate::application::availability::{ReportWatcher, WatchStatus};
use crate::application::handlers::documents::load_document;
use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;
use crate::ports::{CollaboratorError, DocumentStore, ReportAvailability, ReportSource};

#[derive(Debug, Clone, PartialEq)]
pub enum ReportLookup {
    Found(ReportDocument),
    /// A poll is running for this id.
    Processing,
}

#[derive(Debug, Error)]
pub enum ReportLookupError {
    #[error("Report not found: {0}")]
    NotFound(ReportId),

    /// Polling gave up; the user has to upload again.
    #[error("Report {0} is still being processed")]
    StillProcessing(ReportId),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

pub struct ReportLookupHandler {
    store: Arc<dyn DocumentStore>,
    source: Arc<dyn ReportSource>,
    watcher: Arc<ReportWatcher>,
}

impl ReportLookupHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        source: Arc<dyn ReportSource>,
        watcher: Arc<ReportWatcher>,
    ) -> Self {
        Self {
            store,
            source,
            watcher,
        }
    }

    pub async fn handle(&self, id: &ReportId) -> Result<ReportLookup, ReportLookupError> {
        if let Some(document) = load_document(self.store.as_ref(), id).await? {
            self.watcher.forget(id).await;
            return Ok(ReportLookup::Found(document));
        }

        match self.watcher.status(id).await {
            WatchStatus::Watching => return Ok(ReportLookup::Processing),
            WatchStatus::Exhausted => return Err(ReportLookupError::StillProcessing(id.clone())),
            WatchStatus::Unknown => {}
        }

        match self.source.fetch(id).await? {
            ReportAvailability::Ready(document) => {
                self.store.set(id, document.clone()).await?;
                self.watcher.forget(id).await;
                tracing::info!(report_id = %id, "Report fetched from backend and cached");
                Ok(ReportLookup::Found(document))
            }
            ReportAvailability::NotReady => Err(ReportLookupError::NotFound(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::application::availability::AvailabilityPoller;
    use crate::domain::availability::PollState;
    use crate::domain::report::sample_report;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Backend that always answers with the same availability.
    struct FixedSource {
        reply: Result<ReportAvailability, CollaboratorError>,
        fetches: AtomicU32,
    }

    #[async_trait]
    impl ReportSource for FixedSource {
        async fn fetch(&self, _id: &ReportId) -> Result<ReportAvailability, CollaboratorError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct Fixture {
        handler: ReportLookupHandler,
        store: Arc<InMemoryDocumentStore>,
        source: Arc<FixedSource>,
        watcher: Arc<ReportWatcher>,
    }

    fn fixture(reply: Result<ReportAvailability, CollaboratorError>, max_attempts: u32) -> Fixture {
        let store = Arc::new(InMemoryDocumentStore::new());
        let source = Arc::new(FixedSource {
            reply,
            fetches: AtomicU32::new(0),
        });
        let poller = Arc::new(AvailabilityPoller::new(
            source.clone(),
            PollState::new(max_attempts, Duration::from_millis(1)).unwrap(),
        ));
        let watcher = Arc::new(ReportWatcher::new(poller, store.clone()));
        Fixture {
            handler: ReportLookupHandler::new(store.clone(), source.clone(), watcher.clone()),
            store,
            source,
            watcher,
        }
    }

    fn doc() -> ReportDocument {
        ReportDocument::from_value(json!({"property_details": {"property_name": "Elm"}})).unwrap()
    }

    fn id(s: &str) -> ReportId {
        ReportId::new(s).unwrap()
    }

    #[tokio::test]
    async fn sample_ids_short_circuit() {
        let f = fixture(Ok(ReportAvailability::NotReady), 1);

        let found = f.handler.handle(&id("demo")).await.unwrap();

        assert_eq!(found, ReportLookup::Found(sample_report()));
        assert_eq!(f.source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stored_report_skips_backend() {
        let f = fixture(Ok(ReportAvailability::NotReady), 1);
        f.store.set(&id("r1"), doc()).await.unwrap();

        assert_eq!(f.handler.handle(&id("r1")).await.unwrap(), ReportLookup::Found(doc()));
        assert_eq!(f.source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_report_is_cached() {
        let f = fixture(Ok(ReportAvailability::Ready(doc())), 1);

        f.handler.handle(&id("r1")).await.unwrap();
        f.handler.handle(&id("r1")).await.unwrap();

        assert_eq!(f.source.fetches.load(Ordering::SeqCst), 1);
        assert!(f.store.contains(&id("r1")).await.unwrap());
    }

    #[tokio::test]
    async fn running_watch_reports_processing() {
        let f = fixture(Ok(ReportAvailability::NotReady), 10_000);
        f.watcher.watch(id("r1")).await;

        assert_eq!(f.handler.handle(&id("r1")).await.unwrap(), ReportLookup::Processing);
        f.watcher.cancel_all().await;
    }

    #[tokio::test]
    async fn exhausted_watch_reports_still_processing() {
        let f = fixture(Ok(ReportAvailability::NotReady), 1);
        f.watcher.watch(id("r1")).await;
        tokio::time::timeout(Duration::from_secs(5), async {
            while f.watcher.status(&id("r1")).await != WatchStatus::Exhausted {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        let err = f.handler.handle(&id("r1")).await.unwrap_err();
        assert!(matches!(err, ReportLookupError::StillProcessing(_)));
    }

    #[tokio::test]
    async fn stored_report_clears_exhaustion() {
        let f = fixture(Ok(ReportAvailability::NotReady), 1);
        f.watcher.watch(id("r1")).await;
        tokio::time::timeout(Duration::from_secs(5), async {
            while f.watcher.status(&id("r1")).await != WatchStatus::Exhausted {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        f.store.set(&id("r1"), doc()).await.unwrap();

        assert_eq!(f.handler.handle(&id("r1")).await.unwrap(), ReportLookup::Found(doc()));
        assert_eq!(f.watcher.status(&id("r1")).await, WatchStatus::Unknown);
        assert_eq!(f.watcher.exhausted_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        let f = fixture(Ok(ReportAvailability::NotReady), 1);
        let err = f.handler.handle(&id("nope")).await.unwrap_err();
        assert!(matches!(err, ReportLookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn backend_outage_is_collaborator_error() {
        let f = fixture(Err(CollaboratorError::unavailable("report backend", "down")), 1);
        let err = f.handler.handle(&id("r1")).await.unwrap_err();
        assert!(matches!(err, ReportLookupError::Collaborator(_)));
    }
}
