use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::models::{AnalysisResult, SoilInput};

/// Failure raised by an inference capability.
///
/// Its shape is deliberately loose: an optional HTTP-style status and a
/// free-form description of whatever went wrong on the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub description: String,
}

impl InferenceFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            status: None,
            description: description.into(),
        }
    }

    pub fn with_status(status: u16, description: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            description: description.into(),
        }
    }

    /// JSON rendering of the whole failure
    pub fn serialized(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for InferenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "inference failed with status {}: {}", status, self.description),
            None => write!(f, "inference failed: {}", self.description),
        }
    }
}

impl std::error::Error for InferenceFailure {}

pub type InferenceResult<T> = std::result::Result<T, InferenceFailure>;

/// Port for the external AI analysis service
#[async_trait]
pub trait InferenceCapability: Send + Sync {
    /// Analyze typed soil parameters
    async fn analyze_from_parameters(&self, input: &SoilInput) -> InferenceResult<AnalysisResult>;

    /// Analyze a soil photo
    ///
    /// # Arguments
    /// * `image` - Raw image bytes
    /// * `mime_type` - Image MIME type, e.g. `image/jpeg`
    /// * `crop_hint` - Crop label from the current draft, possibly empty
    async fn analyze_from_image(
        &self,
        image: &[u8],
        mime_type: &str,
        crop_hint: &str,
    ) -> InferenceResult<AnalysisResult>;
}

#[async_trait]
impl<T> InferenceCapability for Arc<T>
where
    T: InferenceCapability + ?Sized,
{
    async fn analyze_from_parameters(&self, input: &SoilInput) -> InferenceResult<AnalysisResult> {
        (**self).analyze_from_parameters(input).await
    }

    async fn analyze_from_image(
        &self,
        image: &[u8],
        mime_type: &str,
        crop_hint: &str,
    ) -> InferenceResult<AnalysisResult> {
        (**self).analyze_from_image(image, mime_type, crop_hint).await
    }
}
