//! Report availability: bounded polling while the backend builds a report.

mod poller;
mod report_watcher;

pub use poller::{cancellation, AvailabilityPoller, CancelHandle, PollOutcome};
pub use report_watcher::{ReportWatcher, WatchStatus, DEFAULT_EXHAUSTED_CAPACITY};
