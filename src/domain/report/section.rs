//! Top-level sections of a report document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The fixed top-level sections of the report schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    PropertyDetails,
    BrokerInfo,
    FinancialSummary,
    ReportSummaries,
    Comparables,
    DebtFinancing,
    ModelingData,
    #[serde(rename = "proscons")]
    ProsCons,
}

impl ReportSection {
    /// All sections in schema order.
    pub fn all() -> &'static [ReportSection] {
        &[
            ReportSection::PropertyDetails,
            ReportSection::BrokerInfo,
            ReportSection::FinancialSummary,
            ReportSection::ReportSummaries,
            ReportSection::Comparables,
            ReportSection::DebtFinancing,
            ReportSection::ModelingData,
            ReportSection::ProsCons,
        ]
    }

    /// JSON key of the section.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSection::PropertyDetails => "property_details",
            ReportSection::BrokerInfo => "broker_info",
            ReportSection::FinancialSummary => "financial_summary",
            ReportSection::ReportSummaries => "report_summaries",
            ReportSection::Comparables => "comparables",
            ReportSection::DebtFinancing => "debt_financing",
            ReportSection::ModelingData => "modeling_data",
            ReportSection::ProsCons => "proscons",
        }
    }

    /// Human-readable label for confirmation messages.
    pub fn label(&self) -> &'static str {
        match self {
            ReportSection::PropertyDetails => "property details",
            ReportSection::BrokerInfo => "broker info",
            ReportSection::FinancialSummary => "financial summary",
            ReportSection::ReportSummaries => "report summaries",
            ReportSection::Comparables => "comparables",
            ReportSection::DebtFinancing => "debt financing",
            ReportSection::ModelingData => "modeling data",
            ReportSection::ProsCons => "pros and cons",
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportSection::all()
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("section", format!("unknown section '{}'", s))
            })
    }
}
