use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorEnvelope};

/// Response envelope before routing. `data` stays untyped until we know
/// which arm we are on.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    msg_trans: Option<String>,
}

/// Decode a response body into the success payload or an [`ApiError::Api`].
///
/// `error: true` keeps the whole envelope. A body that is not JSON, or whose
/// `data` does not fit `T`, becomes a synthesized error envelope so callers
/// only ever see one failure path for bad responses.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| ApiError::Api(ErrorEnvelope::malformed(e)))?;

    if envelope.error {
        let envelope = ErrorEnvelope {
            error: true,
            data: envelope.data,
            msg_trans: envelope.msg_trans,
        };
        warn!("API returned error: {}", envelope);
        return Err(ApiError::Api(envelope));
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data).map_err(|e| ApiError::Api(ErrorEnvelope::malformed(e)))
}

/// Thin JSON-envelope client over reqwest.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.request(Method::GET, url, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, url, Some(body)).await
    }

    /// Issue a request and route the decoded envelope.
    ///
    /// HTTP status does not decide the outcome; the envelope does.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            debug!("{} returned HTTP {}", url, status);
        }

        decode_envelope(&bytes)
    }
}
