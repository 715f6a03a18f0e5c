//! HTTP implementation of [`Backend`] over `reqwest`.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use warden_protocol::{Codec, JsonCodec, ReportRequest, VerifyRequest, VerifyResponse};

use crate::{Backend, BackendError};

const VERIFY_PATH: &str = "/auth/verify-player";
const REPORT_PATH: &str = "/anticheat/report";
const API_KEY_HEADER: &str = "X-Api-Key";
const JSON: &str = "application/json";

/// Talks to the backend over HTTP(S).
///
/// One client is built at startup and shared (behind an `Arc`) by every
/// request task; `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    codec: JsonCodec,
}

impl HttpBackend {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// An empty `api_key` means no `X-Api-Key` header is sent. `timeout`
    /// bounds each whole request, connect included.
    ///
    /// # Errors
    /// [`BackendError::Config`] if the URL has no http(s) scheme or the
    /// underlying client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BackendError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("warden/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        let api_key = Some(api_key.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        if api_key.is_none() {
            tracing::warn!("no backend API key configured, requests are unauthenticated");
        }

        Ok(Self {
            http,
            base_url,
            api_key,
            timeout,
            codec: JsonCodec,
        })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs an encoded JSON body and returns the status and raw response body.
    async fn post(&self, path: &str, payload: Vec<u8>) -> Result<(u16, Vec<u8>), BackendError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(payload);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        tracing::debug!(%url, status, len = bytes.len(), "backend responded");
        Ok((status, bytes.to_vec()))
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Http(err)
        }
    }
}

/// Non-2xx becomes [`BackendError::Status`], keeping the body.
fn require_success(status: u16, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        let body = String::from_utf8_lossy(&body).into_owned();
        tracing::warn!(status, %body, "backend returned an error status");
        Err(BackendError::Status { status, body })
    }
}

impl Backend for HttpBackend {
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, BackendError> {
        let (status, body) = self.post(VERIFY_PATH, self.codec.encode(&request)?).await?;
        let body = require_success(status, body)?;
        Ok(self.codec.decode(&body)?)
    }

    async fn report(&self, request: ReportRequest) -> Result<String, BackendError> {
        let (status, body) = self.post(REPORT_PATH, self.codec.encode(&request)?).await?;
        let body = require_success(status, body)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
