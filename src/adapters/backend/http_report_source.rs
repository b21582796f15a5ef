//! Report fetch over HTTP.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::BackendConfig;
use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;
use crate::ports::{CollaboratorError, ReportAvailability, ReportSource};

use super::{build_client, send_error};

const SERVICE: &str = "report backend";

/// `GET <base><report_path><id>`.
///
/// 200 carries the report, 202 and 404 mean it is not available yet.
pub struct HttpReportSource {
    config: BackendConfig,
    client: Client,
}

impl HttpReportSource {
    pub fn new(config: BackendConfig) -> Result<Self, CollaboratorError> {
        let client = build_client(&config, SERVICE)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch(&self, id: &ReportId) -> Result<ReportAvailability, CollaboratorError> {
        let url = self.config.report_url(id.as_str());
        tracing::debug!(report_id = %id, url = %url, "Fetching report");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return availability_for_status(status).map(|()| ReportAvailability::NotReady);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?;
        parse_report_body(body).map(ReportAvailability::Ready)
    }
}

/// Non-200 statuses: 202/404 are "not yet", anything else is a failure.
fn availability_for_status(status: StatusCode) -> Result<(), CollaboratorError> {
    match status {
        StatusCode::ACCEPTED | StatusCode::NOT_FOUND => Ok(()),
        other => Err(CollaboratorError::unavailable(
            SERVICE,
            format!("unexpected status {}", other),
        )),
    }
}

fn parse_report_body(body: Value) -> Result<ReportDocument, CollaboratorError> {
    ReportDocument::from_value(body)
        .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepted_and_not_found_mean_not_ready() {
        assert!(availability_for_status(StatusCode::ACCEPTED).is_ok());
        assert!(availability_for_status(StatusCode::NOT_FOUND).is_ok());
    }

    #[test]
    fn server_errors_are_unavailable() {
        let err = availability_for_status(StatusCode::BAD_GATEWAY).unwrap_err();
        assert_eq!(err.kind(), "collaborator_unavailable");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn object_body_becomes_document() {
        let doc = parse_report_body(json!({"property_details": {"unit_count": 25}})).unwrap();
        assert_eq!(doc.pointer("property_details.unit_count"), Some(&json!(25)));
    }

    #[test]
    fn non_object_body_is_invalid_response() {
        let err = parse_report_body(json!(["not", "a", "report"])).unwrap_err();
        assert_eq!(err.kind(), "collaborator_invalid_response");
    }

    #[tokio::test]
    async fn fetch_against_closed_port_is_unavailable() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };
        let source = HttpReportSource::new(config).unwrap();
        let err = source
            .fetch(&ReportId::new("r1").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "collaborator_unavailable");
    }
}
