//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Maximum length of a report identifier.
pub const MAX_REPORT_ID_LEN: usize = 128;

/// Identifier of a report document.
///
/// Minted by the upload backend (for example `report_lq2x9k_ab12cd`) or one of
/// the reserved demo identifiers. Restricted to `[A-Za-z0-9_-]` so it can be
/// embedded in URLs without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportId(String);

impl ReportId {
    /// Creates a validated ReportId.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("report_id"));
        }
        if id.len() > MAX_REPORT_ID_LEN {
            return Err(ValidationError::too_long("report_id", MAX_REPORT_ID_LEN));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "report_id",
                "only letters, digits, '_' and '-' are allowed",
            ));
        }
        Ok(Self(id))
    }

    /// Mints a fresh identifier (`report_<base36 millis>_<6 hex>`), used when
    /// the ingestion backend does not return one.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("report_{}_{}", to_base36(millis), &suffix[..6]))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReportId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ReportId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReportId> for String {
    fn from(id: ReportId) -> Self {
        id.0
    }
}

/// Unique identifier for a conversation session (one per open chat panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod report_id {
        use super::*;

        #[test]
        fn accepts_backend_minted_ids() {
            let id = ReportId::new("report_lq2x9k_ab12cd").unwrap();
            assert_eq!(id.as_str(), "report_lq2x9k_ab12cd");
            assert_eq!(id.to_string(), "report_lq2x9k_ab12cd");
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                ReportId::new(""),
                Err(ValidationError::EmptyField { .. })
            ));
        }

        #[test]
        fn rejects_path_characters() {
            assert!(matches!(
                ReportId::new("../etc/passwd"),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }

        #[test]
        fn rejects_overlong() {
            let long = "a".repeat(MAX_REPORT_ID_LEN + 1);
            assert!(matches!(
                ReportId::new(long),
                Err(ValidationError::TooLong { .. })
            ));
        }

        #[test]
        fn generated_ids_are_valid_and_distinct() {
            let a = ReportId::generate();
            let b = ReportId::generate();
            assert!(a.as_str().starts_with("report_"));
            assert!(ReportId::new(a.as_str()).is_ok());
            assert_ne!(a, b);
        }

        #[test]
        fn base36_encoding() {
            assert_eq!(to_base36(0), "0");
            assert_eq!(to_base36(35), "z");
            assert_eq!(to_base36(36), "10");
        }

        #[test]
        fn deserializes_with_validation() {
            let id: ReportId = serde_json::from_str("\"demo\"").unwrap();
            assert_eq!(id.as_str(), "demo");
            assert!(serde_json::from_str::<ReportId>("\"a b\"").is_err());
        }
    }

    #[test]
    fn session_id_round_trips_through_display() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }
}
