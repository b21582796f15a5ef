//! Built-in sample report served for demo identifiers.

use once_cell::sync::Lazy;

use super::ReportDocument;
use crate::domain::foundation::ReportId;

/// Identifiers that always resolve to the sample report.
pub const SAMPLE_REPORT_IDS: [&str; 4] = ["0", "1", "demo", "test"];

static SAMPLE_REPORT: Lazy<ReportDocument> = Lazy::new(|| {
    let raw = include_str!("schemas/sample_report.json");
    serde_json::from_str(raw)
        .unwrap_or_else(|e| panic!("Failed to parse embedded sample report: {}", e))
});

/// True if the identifier is reserved for the sample report.
pub fn is_sample_id(id: &ReportId) -> bool {
    SAMPLE_REPORT_IDS.contains(&id.as_str())
}

/// The sample report (Point Apartments, Port Orchard WA).
pub fn sample_report() -> ReportDocument {
    SAMPLE_REPORT.clone()
}
