//! Retrieval-augmented answers from the ingestion backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::domain::report::ReportDocument;
use crate::ports::{CollaboratorError, EscalationService};

use super::{build_client, send_error};

const SERVICE: &str = "retrieval backend";

/// `POST <base><query_path>?query=<q>` with the report as JSON body.
pub struct HttpRetrievalClient {
    config: BackendConfig,
    client: Client,
}

#[derive(Serialize)]
struct RetrievalRequest<'a> {
    document: &'a ReportDocument,
}

/// The backend answers with `response`; older deployments use `answer`.
#[derive(Debug, Deserialize)]
struct RetrievalResponse {
    response: Option<String>,
    answer: Option<String>,
}

impl HttpRetrievalClient {
    pub fn new(config: BackendConfig) -> Result<Self, CollaboratorError> {
        let client = build_client(&config, SERVICE)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl EscalationService for HttpRetrievalClient {
    async fn retrieve(
        &self,
        query: &str,
        document: &ReportDocument,
    ) -> Result<String, CollaboratorError> {
        tracing::info!(query_len = query.len(), "Escalating query to retrieval");

        let response = self
            .client
            .post(self.config.query_url())
            .query(&[("query", query)])
            .json(&RetrievalRequest { document })
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::unavailable(
                SERVICE,
                format!("unexpected status {}", status),
            ));
        }

        let body: RetrievalResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?;
        answer_text(body)
    }
}

fn answer_text(body: RetrievalResponse) -> Result<String, CollaboratorError> {
    body.response
        .or(body.answer)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| CollaboratorError::invalid_response(SERVICE, "no answer in response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> Result<String, CollaboratorError> {
        answer_text(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn reads_response_field() {
        let text = parse(json!({"query": "q", "response": " Cap rate is 6.1% "})).unwrap();
        assert_eq!(text, "Cap rate is 6.1%");
    }

    #[test]
    fn falls_back_to_answer_field() {
        assert_eq!(parse(json!({"answer": "42"})).unwrap(), "42");
    }

    #[test]
    fn empty_answer_is_invalid() {
        assert!(parse(json!({"response": "   "})).is_err());
        assert!(parse(json!({"query": "q"})).is_err());
    }

    #[test]
    fn request_body_wraps_document() {
        let doc = ReportDocument::from_value(json!({"proscons": {"pros": ["Quiet"]}})).unwrap();
        let body = serde_json::to_value(RetrievalRequest { document: &doc }).unwrap();
        assert_eq!(body, json!({"document": {"proscons": {"pros": ["Quiet"]}}}));
    }
}
