//! First-wins deep merge of JSON values.
//!
//! `merge(partial, base)` folds a partial object into a base object. Values
//! present in `partial` win, including `null`, `0`, `false` and `""`. Keys
//! missing from `partial` keep the `base` value. Objects merge key by key;
//! everything else, arrays included, is replaced wholesale.

use serde_json::{Map, Value};

/// Merges `partial` into `base`, `partial` winning wherever it is present.
pub fn merge(partial: &Value, base: &Value) -> Value {
    merge_present(Some(partial), Some(base)).unwrap_or(Value::Null)
}

/// Merge where either side may be absent.
///
/// Absent is distinct from `null`: an absent `partial` keeps `base`, while an
/// explicit `null` replaces it. Returns `None` only when both sides are absent.
pub fn merge_present(partial: Option<&Value>, base: Option<&Value>) -> Option<Value> {
    match (partial, base) {
        (None, None) => None,
        (None, Some(base)) => Some(base.clone()),
        (Some(Value::Object(p)), Some(Value::Object(b))) => Some(Value::Object(merge_maps(p, b))),
        (Some(partial), _) => Some(partial.clone()),
    }
}

/// Key-wise merge of two objects; the result holds the union of both key sets.
pub fn merge_maps(partial: &Map<String, Value>, base: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in partial {
        if let Some(next) = merge_present(Some(value), base.get(key)) {
            merged.insert(key.clone(), next);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod presence {
        use super::*;

        #[test]
        fn zero_wins_over_non_zero() {
            let merged = merge(&json!({"a": 0}), &json!({"a": 5}));
            assert_eq!(merged["a"], json!(0));
        }

        #[test]
        fn false_wins_over_true() {
            let merged = merge(&json!({"a": false}), &json!({"a": true}));
            assert_eq!(merged["a"], json!(false));
        }

        #[test]
        fn empty_string_wins_over_text() {
            let merged = merge(&json!({"a": ""}), &json!({"a": "x"}));
            assert_eq!(merged["a"], json!(""));
        }

        #[test]
        fn explicit_null_overwrites() {
            let merged = merge(&json!({"a": null}), &json!({"a": 3, "b": 4}));
            assert_eq!(merged, json!({"a": null, "b": 4}));
        }

        #[test]
        fn absent_key_keeps_base() {
            let merged = merge(&json!({"b": 1}), &json!({"a": 3}));
            assert_eq!(merged, json!({"a": 3, "b": 1}));
        }

        #[test]
        fn both_absent_is_absent() {
            assert_eq!(merge_present(None, None), None);
        }
    }

    mod structure {
        use super::*;

        #[test]
        fn nested_objects_merge_recursively() {
            let partial = json!({"property_details": {"address": "123 Main St"}});
            let base = json!({"property_details": {"address": "1 A St", "unit_count": 25}});
            assert_eq!(
                merge(&partial, &base),
                json!({"property_details": {"address": "123 Main St", "unit_count": 25}})
            );
        }

        #[test]
        fn arrays_replace_wholesale() {
            let partial = json!({"pros": ["walkable"]});
            let base = json!({"pros": ["quiet", "new roof"]});
            assert_eq!(merge(&partial, &base), json!({"pros": ["walkable"]}));
        }

        #[test]
        fn object_replaces_primitive() {
            let merged = merge(&json!({"a": {"b": 1}}), &json!({"a": 7}));
            assert_eq!(merged, json!({"a": {"b": 1}}));
        }

        #[test]
        fn primitive_replaces_object() {
            let merged = merge(&json!({"a": 7}), &json!({"a": {"b": 1}}));
            assert_eq!(merged, json!({"a": 7}));
        }

        #[test]
        fn empty_partial_is_identity() {
            let base = json!({"a": {"b": [1, 2]}, "c": null});
            assert_eq!(merge(&json!({}), &base), base);
        }

        #[test]
        fn empty_base_yields_partial() {
            let partial = json!({"a": {"b": 1}, "c": [true]});
            assert_eq!(merge(&partial, &json!({})), partial);
        }

        #[test]
        fn non_object_partial_wins_at_root() {
            assert_eq!(merge(&json!([1]), &json!({"a": 1})), json!([1]));
        }
    }
}
