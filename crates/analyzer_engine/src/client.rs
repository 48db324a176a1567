use std::time::Duration;

use analyzer_core::AnalysisRecord;
use engine_logging::engine_debug;
use reqwest::StatusCode;
use url::Url;

use crate::wire::{AnalyzeRequest, WireAnalysis, WireError};
use crate::TransportError;

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Root of the analysis service; `/analyze` is appended.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, url: &str) -> Result<AnalysisRecord, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestAnalysisClient {
    pub fn new(settings: AnalysisSettings) -> Result<Self, TransportError> {
        let endpoint = analyze_endpoint(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn analyze(&self, url: &str) -> Result<AnalysisRecord, TransportError> {
        engine_debug!("POST {} url={}", self.endpoint, url);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnalyzeRequest { url })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                code: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let wire: WireAnalysis = serde_json::from_slice(&body)
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        Ok(wire.into_record())
    }
}

fn analyze_endpoint(base_url: &str) -> Result<Url, TransportError> {
    let mut base =
        Url::parse(base_url).map_err(|err| TransportError::InvalidUrl(err.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("analyze")
        .map_err(|err| TransportError::InvalidUrl(err.to_string()))
}

/// Service-provided diagnostic if the body carries one, else a generic line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<WireError>(body)
        .ok()
        .and_then(WireError::into_message)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    TransportError::Network(err.to_string())
}
