//! ReportWatcher - one background poll per report id.
//!
//! A watch stores the report once it is ready. Exhausted watches are
//! remembered so lookups can tell the user to start over instead of
//! reporting "not found". The memory is bounded: the oldest exhausted ids
//! are forgotten first, and an id is forgotten as soon as its report shows
//! up. Dropping the watcher cancels every running poll.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::foundation::ReportId;
use crate::ports::DocumentStore;

use super::poller::{cancellation, AvailabilityPoller, CancelHandle, PollOutcome};

/// What the watcher knows about a report id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    /// A poll is running.
    Watching,
    /// The last poll ran out of attempts.
    Exhausted,
    Unknown,
}

struct Watch {
    generation: u64,
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

type Watches = RwLock<HashMap<ReportId, Watch>>;

/// Exhausted ids remembered by default.
pub const DEFAULT_EXHAUSTED_CAPACITY: usize = 1024;

/// Exhausted ids in insertion order, evicting the oldest past `capacity`.
#[derive(Debug)]
struct ExhaustedIds {
    ids: HashSet<ReportId>,
    order: VecDeque<ReportId>,
    capacity: usize,
}

impl ExhaustedIds {
    fn new(capacity: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn insert(&mut self, id: ReportId) {
        if self.ids.insert(id.clone()) {
            self.order.push_back(id);
        }
        while self.ids.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.ids.remove(&oldest);
        }
    }

    fn remove(&mut self, id: &ReportId) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.order.retain(|other| other != id);
        true
    }

    fn contains(&self, id: &ReportId) -> bool {
        self.ids.contains(id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

pub struct ReportWatcher {
    poller: Arc<AvailabilityPoller>,
    store: Arc<dyn DocumentStore>,
    watches: Arc<Watches>,
    exhausted: Arc<RwLock<ExhaustedIds>>,
    generation: AtomicU64,
}

impl ReportWatcher {
    pub fn new(poller: Arc<AvailabilityPoller>, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_exhausted_capacity(poller, store, DEFAULT_EXHAUSTED_CAPACITY)
    }

    pub fn with_exhausted_capacity(
        poller: Arc<AvailabilityPoller>,
        store: Arc<dyn DocumentStore>,
        capacity: usize,
    ) -> Self {
        Self {
            poller,
            store,
            watches: Arc::new(RwLock::new(HashMap::new())),
            exhausted: Arc::new(RwLock::new(ExhaustedIds::new(capacity))),
            generation: AtomicU64::new(0),
        }
    }

    /// Starts polling for `id`. Returns false if a poll is already running.
    pub async fn watch(&self, id: ReportId) -> bool {
        let mut watches = self.watches.write().await;
        if watches.contains_key(&id) {
            return false;
        }
        self.exhausted.write().await.remove(&id);

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let (cancel, receiver) = cancellation();
        let poller = Arc::clone(&self.poller);
        let store = Arc::clone(&self.store);
        let exhausted = Arc::clone(&self.exhausted);
        let registry = Arc::downgrade(&self.watches);
        let task_id = id.clone();

        let task = tokio::spawn(async move {
            match poller.run(&task_id, receiver).await {
                Ok(PollOutcome::Ready(document)) => {
                    if let Err(err) = store.set(&task_id, document).await {
                        tracing::warn!(report_id = %task_id, error = %err, "Failed to store ready report");
                    }
                }
                Ok(PollOutcome::Exhausted { .. }) => {
                    exhausted.write().await.insert(task_id.clone());
                }
                Ok(PollOutcome::Cancelled) => {
                    tracing::debug!(report_id = %task_id, "Watch cancelled");
                }
                Err(err) => {
                    tracing::error!(report_id = %task_id, error = %err, "Poll state machine rejected a transition");
                }
            }
            release(&registry, &task_id, generation).await;
        });

        watches.insert(
            id,
            Watch {
                generation,
                cancel,
                task,
            },
        );
        true
    }

    pub async fn status(&self, id: &ReportId) -> WatchStatus {
        if self.watches.read().await.contains_key(id) {
            WatchStatus::Watching
        } else if self.exhausted.read().await.contains(id) {
            WatchStatus::Exhausted
        } else {
            WatchStatus::Unknown
        }
    }

    /// Drops the exhausted mark for `id` once its report is available.
    /// Returns whether one was set.
    pub async fn forget(&self, id: &ReportId) -> bool {
        if !self.exhausted.read().await.contains(id) {
            return false;
        }
        self.exhausted.write().await.remove(id)
    }

    pub async fn exhausted_count(&self) -> usize {
        self.exhausted.read().await.len()
    }

    /// Cancels the poll for `id`. Returns whether one was running.
    pub async fn cancel(&self, id: &ReportId) -> bool {
        let watch = self.watches.write().await.remove(id);
        match watch {
            Some(watch) => {
                watch.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every running poll and waits for their tasks to finish.
    pub async fn cancel_all(&self) {
        let drained: Vec<Watch> = self.watches.write().await.drain().map(|(_, w)| w).collect();
        tracing::info!(count = drained.len(), "Cancelling report watches");
        for watch in drained {
            watch.cancel.cancel();
            if let Err(err) = watch.task.await {
                tracing::warn!(error = %err, "Watch task ended abnormally");
            }
        }
    }

    pub async fn active_count(&self) -> usize {
        self.watches.read().await.len()
    }
}

/// Removes a finished watch, unless it has been replaced since.
async fn release(registry: &Weak<Watches>, id: &ReportId, generation: u64) {
    let Some(watches) = registry.upgrade() else {
        return;
    };
    let mut watches = watches.write().await;
    if watches.get(id).is_some_and(|w| w.generation == generation) {
        watches.remove(id);
    }
}
