//! Classification of raw model text.
//!
//! A model reply that is not a function call is either the escalation
//! sentinel `{"result": "call_rag"}`, some other JSON object, or prose.

use serde_json::{Map, Value};

/// Key and value of the escalation sentinel object.
pub const ESCALATION_KEY: &str = "result";
pub const ESCALATION_VALUE: &str = "call_rag";

/// The sentinel as a JSON value.
pub fn escalation_sentinel() -> Value {
    serde_json::json!({ ESCALATION_KEY: ESCALATION_VALUE })
}

/// True if the object is exactly the escalation sentinel.
pub fn is_escalation_sentinel(object: &Map<String, Value>) -> bool {
    object.len() == 1
        && object.get(ESCALATION_KEY).and_then(Value::as_str) == Some(ESCALATION_VALUE)
}

/// Shape of a raw text reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape {
    Empty,
    Sentinel,
    Object(Map<String, Value>),
    Text(String),
}

/// Classifies a raw text reply after trimming and removing a Markdown fence.
///
/// Text that parses as JSON but not as an object (a bare number, a quoted
/// string) is kept as prose.
pub fn classify_reply(raw: &str) -> ReplyShape {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ReplyShape::Empty;
    }

    let unfenced = strip_code_fence(trimmed);
    if unfenced.starts_with('{') {
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(unfenced) {
            if is_escalation_sentinel(&object) {
                return ReplyShape::Sentinel;
            }
            return ReplyShape::Object(object);
        }
    }

    ReplyShape::Text(trimmed.to_string())
}

/// Removes a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.trim()
}
