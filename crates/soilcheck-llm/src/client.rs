use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde::Serialize;
use soilcheck_core::config::LayeredConfig;
use soilcheck_core::error::{Result, SoilcheckError};
use soilcheck_core::models::{AnalysisResult, SoilInput};
use soilcheck_core::ports::{InferenceCapability, InferenceFailure, InferenceResult};
use std::time::Duration;

/// Image types the inference service accepts
pub const SUPPORTED_MIME_TYPES: [&str; 5] =
    ["image/jpeg", "image/png", "image/webp", "image/heic", "image/heif"];

const PARAMETERS_PATH: &str = "/v1/analyze/parameters";
const IMAGE_PATH: &str = "/v1/analyze/image";

/// JSON-over-HTTP client for the soil inference service
pub struct HttpInferenceClient {
    /// Base URL, without trailing slash (e.g., "http://localhost:8787")
    endpoint: String,

    /// Optional bearer token
    api_key: Option<String>,

    /// HTTP client with the request timeout applied
    client: reqwest::Client,
}

impl HttpInferenceClient {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            SoilcheckError::ConfigInvalid {
                key: "http_client".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Create a client from layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(
            config.endpoint.value.clone(),
            config.api_key.value.clone(),
            Duration::from_secs(config.timeout_secs.value),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> InferenceResult<AnalysisResult> {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!(url = %url, "Sending inference request");

        let mut request = self.client.post(&url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_failure(status, body));
        }

        let bytes = response.bytes().await.map_err(transport_failure)?;
        serde_json::from_slice::<AnalysisResult>(&bytes)
            .map_err(|e| InferenceFailure::new(format!("Malformed inference response: {}", e)))
    }
}

#[async_trait]
impl InferenceCapability for HttpInferenceClient {
    async fn analyze_from_parameters(&self, input: &SoilInput) -> InferenceResult<AnalysisResult> {
        self.post(PARAMETERS_PATH, &ParametersRequest { input }).await
    }

    async fn analyze_from_image(
        &self,
        image: &[u8],
        mime_type: &str,
        crop_hint: &str,
    ) -> InferenceResult<AnalysisResult> {
        if !is_supported_mime_type(mime_type) {
            return Err(InferenceFailure::new(format!(
                "Unsupported image type '{}'. Supported types: {}",
                mime_type,
                SUPPORTED_MIME_TYPES.join(", ")
            )));
        }

        let request = ImageRequest {
            image: BASE64.encode(image),
            mime_type,
            crop_hint,
        };
        self.post(IMAGE_PATH, &request).await
    }
}

/// Whether the inference service accepts this image type
pub fn is_supported_mime_type(mime_type: &str) -> bool {
    let normalized = mime_type.trim().to_lowercase();
    SUPPORTED_MIME_TYPES.contains(&normalized.as_str())
}

fn transport_failure(err: reqwest::Error) -> InferenceFailure {
    let status = err.status().map(|s| s.as_u16());
    // The URL is configuration, not part of the failure
    let err = err.without_url();
    let description = if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else if err.is_connect() {
        format!("Failed to connect to inference service: {}", err)
    } else {
        err.to_string()
    };

    InferenceFailure {
        status,
        description,
    }
}

fn status_failure(status: StatusCode, body: String) -> InferenceFailure {
    let description = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        body
    };
    InferenceFailure::with_status(status.as_u16(), description)
}

/// Request body for parameter-based analysis
#[derive(Debug, Serialize)]
struct ParametersRequest<'a> {
    input: &'a SoilInput,
}

/// Request body for image-based analysis
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest<'a> {
    /// Base64-encoded image bytes
    image: String,
    mime_type: &'a str,
    crop_hint: &'a str,
}
