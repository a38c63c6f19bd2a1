use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Client-caused parameter failures. The message of each variant is the exact
/// response body text, so these must stay human-readable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing url query parameter.")]
    MissingUrl,

    #[error("Missing urls query parameter.")]
    MissingUrls,

    #[error("Invalid URL provided.")]
    InvalidUrl,

    #[error("Invalid delay value.")]
    InvalidDelay,

    #[error("Invalid width or height value.")]
    InvalidDimensions,

    #[error("Invalid fullPage value. Use true or false.")]
    InvalidFullPage,

    #[error("No valid URLs provided.")]
    NoValidUrls,
}

/// Browser-side failures. None of these reach the client verbatim; the HTTP
/// layer logs them and answers with a generic message.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Browser launch failed: {0}")]
    BrowserLaunchFailed(String),

    #[error("Page error: {0}")]
    PageError(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Navigation timed out after {0:?}")]
    NavigationTimeout(Duration),

    #[error("Screenshot capture failed: {0}")]
    CaptureFailed(String),

    #[error("Archive assembly failed: {0}")]
    ArchiveFailed(String),

    #[error("Capture task failed: {0}")]
    TaskFailed(String),
}

impl From<zip::result::ZipError> for CaptureError {
    fn from(err: zip::result::ZipError) -> Self {
        CaptureError::ArchiveFailed(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::ArchiveFailed(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error type returned by the HTTP handlers.
///
/// Validation failures surface their specific message with a 400; rendering
/// failures are collapsed to a generic 500 message per endpoint, with the
/// underlying cause logged server-side only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to take screenshot.")]
    Render(#[source] CaptureError),

    #[error("Failed to take batch screenshots.")]
    BatchRender(#[source] CaptureError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(ref cause) => {
                error!("Error taking screenshot: {cause}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BatchRender(ref cause) => {
                error!("Error in batch screenshot: {cause}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
