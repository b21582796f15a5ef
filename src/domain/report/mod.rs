//! Report documents and the rules for updating them.

mod document;
mod errors;
pub mod merge;
mod sample;
mod schema;
mod section;
pub mod views;

pub use document::{changed_sections, describe_changes, ReportDocument};
pub use errors::{DocumentError, MergeError};
pub(crate) use errors::json_type_name;
pub use merge::merge;
pub use sample::{is_sample_id, sample_report, SAMPLE_REPORT_IDS};
pub use schema::ReportSchema;
pub use section::ReportSection;
