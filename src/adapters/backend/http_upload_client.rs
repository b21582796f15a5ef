//! Multipart upload to the ingestion backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;
use crate::ports::{CollaboratorError, UploadReceipt, UploadService, UploadedFile};

use super::{build_client, send_error};

const SERVICE: &str = "upload backend";

/// `POST <base><upload_path>` with the file in multipart field `file`.
pub struct HttpUploadClient {
    config: BackendConfig,
    client: Client,
}

/// Backend upload response. Both fields are optional on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    report_id: Option<String>,
    report_data: Option<Value>,
}

impl HttpUploadClient {
    pub fn new(config: BackendConfig) -> Result<Self, CollaboratorError> {
        let client = build_client(&config, SERVICE)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl UploadService for HttpUploadClient {
    async fn upload(&self, file: UploadedFile) -> Result<UploadReceipt, CollaboratorError> {
        let filename = file.filename.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, filename = %filename, "Upload rejected by backend");
            return Err(CollaboratorError::unavailable(
                SERVICE,
                format!("status {}: {}", status, body),
            ));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?;
        into_receipt(body)
    }
}

/// A missing id gets a locally generated one; a null or absent report
/// means processing continues in the background.
fn into_receipt(body: UploadResponse) -> Result<UploadReceipt, CollaboratorError> {
    let report_id = match body.report_id {
        Some(id) => ReportId::new(id)
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?,
        None => ReportId::generate(),
    };

    let document = match body.report_data {
        None | Some(Value::Null) => None,
        Some(data) => Some(
            ReportDocument::from_value(data)
                .map_err(|e| CollaboratorError::invalid_response(SERVICE, e.to_string()))?,
        ),
    };

    Ok(UploadReceipt {
        report_id,
        document,
    })
}
