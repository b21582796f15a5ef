//! Typed read-only views over report sections.
//!
//! All fields are optional; unknown keys are ignored. Views are for reading
//! only. Updates always go through the JSON merge so nothing is dropped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub property_name: Option<String>,
    pub address: Option<String>,
    pub unit_count: Option<i64>,
    pub rsf: Option<i64>,
    pub lot_size: Option<f64>,
    pub year_built: Option<i64>,
    #[serde(default)]
    pub unit_types: Vec<UnitType>,
    pub offered_by: Option<OfferedBy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub bedrooms: Option<i64>,
    pub number_of_units: Option<i64>,
    pub unit_sf: Option<f64>,
    pub monthly_rent: Option<f64>,
    pub rent_psf: Option<f64>,
}

impl UnitType {
    /// Monthly rent across all units of this type.
    pub fn monthly_income(&self) -> Option<f64> {
        Some(self.monthly_rent? * self.number_of_units? as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferedBy {
    pub company: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerInfo {
    pub broker_contact_info: Option<BrokerContact>,
    pub brokerage: Option<String>,
    pub investment_strategy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Debt terms. Backends emit loosely typed values here, so text fields stay
/// as raw JSON where the type varies between reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtFinancing {
    pub loan_amount: Option<f64>,
    pub term: Option<serde_json::Value>,
    pub loan_type: Option<String>,
    #[serde(rename = "WALT")]
    pub walt: Option<String>,
    pub lease_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProsCons {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

impl PropertyDetails {
    /// Sum of monthly rent over all unit types that carry both figures.
    pub fn total_monthly_rent(&self) -> Option<f64> {
        let incomes: Vec<f64> = self
            .unit_types
            .iter()
            .filter_map(UnitType::monthly_income)
            .collect();
        if incomes.is_empty() {
            None
        } else {
            Some(incomes.iter().sum())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{sample_report, ReportSection};

    #[test]
    fn property_details_view_reads_sample() {
        let details: PropertyDetails = sample_report()
            .section_view(ReportSection::PropertyDetails)
            .unwrap()
            .unwrap();
        assert_eq!(details.unit_count, Some(25));
        assert_eq!(details.lot_size, None);
        assert_eq!(details.unit_types.len(), 2);
        assert_eq!(
            details.offered_by.and_then(|o| o.contact_person).as_deref(),
            Some("Trevor Kovich")
        );
    }

    #[test]
    fn total_monthly_rent_sums_unit_types() {
        let details: PropertyDetails = sample_report()
            .section_view(ReportSection::PropertyDetails)
            .unwrap()
            .unwrap();
        // 12 * 829 + 13 * 949
        assert_eq!(details.total_monthly_rent(), Some(22285.0));
    }

    #[test]
    fn debt_financing_tolerates_extra_keys() {
        let debt: DebtFinancing = sample_report()
            .section_view(ReportSection::DebtFinancing)
            .unwrap()
            .unwrap();
        assert_eq!(debt.loan_amount, Some(1_800_000.0));
        assert_eq!(debt.walt.as_deref(), Some("25 years"));
    }

    #[test]
    fn missing_section_is_none() {
        let pros: Option<ProsCons> = sample_report()
            .section_view(ReportSection::ProsCons)
            .unwrap();
        assert!(pros.is_none());
    }

    #[test]
    fn mismatched_shape_is_an_error() {
        let doc = crate::domain::report::ReportDocument::from_value(
            serde_json::json!({"broker_info": {"brokerage": 12}}),
        )
        .unwrap();
        assert!(doc.section_view::<BrokerInfo>(ReportSection::BrokerInfo).is_err());
    }
}
