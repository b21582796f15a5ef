//! The report document value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::json_type_name;
use super::merge::merge_maps;
use super::{DocumentError, MergeError, ReportSection};

/// A report document.
///
/// Wraps the JSON object exactly as produced by the ingestion backend, so a
/// missing key stays distinct from an explicit `null`. Every field is
/// optional. A document is never mutated in place: applying an update yields
/// a new document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportDocument(Map<String, Value>);

impl ReportDocument {
    /// Creates an empty document.
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value, rejecting anything but an object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Wraps an already-validated object map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Value of a top-level section, if present.
    pub fn get(&self, section: ReportSection) -> Option<&Value> {
        self.0.get(section.as_str())
    }

    /// Value of an arbitrary top-level key, if present.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks a value up by dotted path (`property_details.unit_count`).
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |current, part| match current {
            Value::Object(map) => map.get(part),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Owned JSON copy of the whole document.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display title: the property name, else the summary name.
    pub fn title(&self) -> Option<&str> {
        self.pointer("property_details.property_name")
            .and_then(Value::as_str)
            .or_else(|| {
                self.pointer("report_summaries.property_summary.name")
                    .and_then(Value::as_str)
            })
    }

    /// Known sections present in this document, in schema order.
    pub fn sections_present(&self) -> Vec<ReportSection> {
        ReportSection::all()
            .iter()
            .copied()
            .filter(|section| self.0.contains_key(section.as_str()))
            .collect()
    }

    /// Deserializes a section into a typed view.
    ///
    /// Returns `Ok(None)` when the section is absent or `null`.
    pub fn section_view<T: DeserializeOwned>(
        &self,
        section: ReportSection,
    ) -> Result<Option<T>, DocumentError> {
        match self.get(section) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| DocumentError::SectionShape {
                    section: section.as_str().to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Folds a partial update into this document, the partial winning.
    pub fn apply_partial(&self, partial: &Value) -> Result<ReportDocument, MergeError> {
        match partial {
            Value::Object(partial) => Ok(Self(merge_maps(partial, &self.0))),
            other => Err(MergeError::NonObjectRoot {
                found: json_type_name(other),
            }),
        }
    }
}

impl TryFrom<Value> for ReportDocument {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Top-level keys whose values differ between two documents.
///
/// Keys added or removed count as changed. Order follows `after`, then any
/// keys only present in `before`.
pub fn changed_sections(before: &ReportDocument, after: &ReportDocument) -> Vec<String> {
    let mut changed: Vec<String> = after
        .0
        .iter()
        .filter(|(key, value)| before.0.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    changed.extend(
        before
            .0
            .keys()
            .filter(|key| !after.0.contains_key(key.as_str()))
            .cloned(),
    );
    changed
}

/// Renders changed keys for a confirmation message.
pub fn describe_changes(changed: &[String]) -> String {
    if changed.is_empty() {
        return "No changes were needed; the report already matches your request.".to_string();
    }
    let labels: Vec<String> = changed
        .iter()
        .map(|key| match key.parse::<ReportSection>() {
            Ok(section) => section.label().to_string(),
            Err(_) => key.replace('_', " "),
        })
        .collect();
    format!("Updated the report: {}.", labels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ReportDocument {
        ReportDocument::from_value(value).unwrap()
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert_eq!(
            ReportDocument::from_value(json!([1, 2])),
            Err(DocumentError::NotAnObject { found: "array" })
        );
        assert!(ReportDocument::from_value(json!("report")).is_err());
    }

    #[test]
    fn deserialize_rejects_non_objects() {
        assert!(serde_json::from_value::<ReportDocument>(json!(42)).is_err());
        assert!(serde_json::from_value::<ReportDocument>(json!({})).is_ok());
    }

    #[test]
    fn preserves_null_versus_absent() {
        let d = doc(json!({"property_details": {"lot_size": null}}));
        assert_eq!(d.pointer("property_details.lot_size"), Some(&Value::Null));
        assert_eq!(d.pointer("property_details.year_built"), None);
    }

    #[test]
    fn pointer_walks_arrays() {
        let d = doc(json!({"proscons": {"pros": ["a", "b"]}}));
        assert_eq!(d.pointer("proscons.pros.1"), Some(&json!("b")));
        assert_eq!(d.pointer("proscons.pros.9"), None);
    }

    #[test]
    fn title_falls_back_to_summary_name() {
        let d = doc(json!({"report_summaries": {"property_summary": {"name": "Lund"}}}));
        assert_eq!(d.title(), Some("Lund"));
        let d = doc(json!({"property_details": {"property_name": "Point"}}));
        assert_eq!(d.title(), Some("Point"));
        assert_eq!(ReportDocument::empty().title(), None);
    }

    #[test]
    fn sections_present_in_schema_order() {
        let d = doc(json!({"proscons": {}, "property_details": {}, "extra": 1}));
        assert_eq!(
            d.sections_present(),
            vec![ReportSection::PropertyDetails, ReportSection::ProsCons]
        );
    }

    #[test]
    fn apply_partial_returns_new_document() {
        let before = doc(json!({"property_details": {"address": "1 A St", "unit_count": 25}}));
        let after = before
            .apply_partial(&json!({"property_details": {"address": "123 Main St"}}))
            .unwrap();
        assert_eq!(
            after.to_value(),
            json!({"property_details": {"address": "123 Main St", "unit_count": 25}})
        );
        assert_eq!(before.pointer("property_details.address"), Some(&json!("1 A St")));
    }

    #[test]
    fn apply_partial_rejects_non_object() {
        let err = ReportDocument::empty().apply_partial(&json!(7)).unwrap_err();
        assert_eq!(err, MergeError::NonObjectRoot { found: "integer" });
    }

    #[test]
    fn changed_sections_reports_modified_added_and_removed() {
        let before = doc(json!({"a": 1, "b": 2, "gone": true}));
        let after = doc(json!({"a": 1, "b": 3, "new": {}}));
        let changed = changed_sections(&before, &after);
        assert_eq!(changed, vec!["b".to_string(), "new".to_string(), "gone".to_string()]);
    }

    #[test]
    fn describe_changes_uses_section_labels() {
        let text = describe_changes(&["property_details".to_string(), "proscons".to_string()]);
        assert_eq!(text, "Updated the report: property details, pros and cons.");
    }

    #[test]
    fn describe_changes_handles_no_op() {
        assert!(describe_changes(&[]).starts_with("No changes"));
    }
}
