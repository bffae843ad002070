use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use deskflow_core::config::ApiConfig;
use deskflow_core::{CreationPayload, LaptopRequest};

use crate::api::{ClientError, CompletionCall, WorkflowApi};
use crate::wire::{self, RawRequestRecord};

/// reqwest-backed implementation of [`WorkflowApi`]. Every call carries
/// the configured bearer credential; the transport timeout comes from
/// configuration, nothing here retries.
pub struct HttpWorkflowClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl HttpWorkflowClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ClientError::Network(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_list(&self, path: String) -> Result<Vec<LaptopRequest>, ClientError> {
        let response = self
            .http
            .get(self.url(&path))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let records: Vec<RawRequestRecord> =
            response.json().await.map_err(|error| ClientError::Decode(error.to_string()))?;
        let batch = wire::decode_records(records);
        if batch.dropped > 0 {
            warn!(
                event_name = "client.records_dropped",
                path = %path,
                dropped = batch.dropped,
                kept = batch.requests.len(),
                "workflow list response contained malformed records"
            );
        }
        debug!(event_name = "client.list_fetched", path = %path, count = batch.requests.len());
        Ok(batch.requests)
    }
}

#[async_trait]
impl WorkflowApi for HttpWorkflowClient {
    async fn start(&self, payload: &CreationPayload) -> Result<LaptopRequest, ClientError> {
        let response = self
            .http
            .post(self.url("process/start"))
            .bearer_auth(self.token.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let record: RawRequestRecord =
            response.json().await.map_err(|error| ClientError::Decode(error.to_string()))?;
        wire::convert(record).map_err(|error| ClientError::Decode(error.to_string()))
    }

    async fn list_by_creator(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError> {
        self.fetch_list(format!("process/created-by/{emp_number}")).await
    }

    async fn list_by_recipient(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError> {
        self.fetch_list(format!("process/created-for/{emp_number}")).await
    }

    async fn list_assigned(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError> {
        self.fetch_list(format!("process/assigned-to/{emp_number}")).await
    }

    async fn complete(&self, call: &CompletionCall) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("process/{}/complete", call.task_id)))
            .bearer_auth(self.token.expose_secret())
            .json(call)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

fn transport_error(error: reqwest::Error) -> ClientError {
    if error.is_decode() {
        ClientError::Decode(error.to_string())
    } else {
        ClientError::Network(error.to_string())
    }
}

/// Classifies non-2xx responses. 401/403 means the credential was
/// rejected or expired; token refresh is the identity provider's job,
/// so it is only surfaced here.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClientError::Auth { status: status.as_u16() });
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Server { status: status.as_u16(), message })
}
