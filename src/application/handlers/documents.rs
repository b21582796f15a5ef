//! Document resolution shared by the chat and report handlers.
//!
//! Reserved sample ids always resolve to the built-in sample and are never
//! written to the store.

use crate::domain::foundation::ReportId;
use crate::domain::report::{is_sample_id, sample_report, ReportDocument};
use crate::ports::{CollaboratorError, DocumentStore};

/// The current document for a report: the sample for reserved ids,
/// otherwise whatever the store holds.
pub(crate) async fn load_document(
    store: &dyn DocumentStore,
    id: &ReportId,
) -> Result<Option<ReportDocument>, CollaboratorError> {
    if is_sample_id(id) {
        return Ok(Some(sample_report()));
    }
    store.get(id).await
}

/// Hands an updated document to the store. Returns false for sample ids,
/// which are read-only.
pub(crate) async fn save_document(
    store: &dyn DocumentStore,
    id: &ReportId,
    document: ReportDocument,
) -> Result<bool, CollaboratorError> {
    if is_sample_id(id) {
        tracing::debug!(report_id = %id, "Sample report is read-only; update not stored");
        return Ok(false);
    }
    store.set(id, document).await?;
    Ok(true)
}
