//! Query-parameter validation for the screenshot endpoints
//!
//! Turns raw query strings into typed requests, or a [`ValidationError`]
//! carrying the exact client-facing message. All validation happens before
//! any browser is launched.

use crate::{ValidationError, Viewport};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Width used when the client supplies only a height.
pub const PARTIAL_DEFAULT_WIDTH: u32 = 800;
/// Height used when the client supplies only a width.
pub const PARTIAL_DEFAULT_HEIGHT: u32 = 600;

/// Raw `GET /screenshot` query parameters, still unvalidated strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenshotQuery {
    pub url: Option<String>,
    pub delay: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    #[serde(rename = "fullPage")]
    pub full_page: Option<String>,
}

/// Raw `GET /batch-screenshot` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchQuery {
    pub urls: Option<String>,
}

/// A validated single-capture request.
#[derive(Debug, Clone)]
pub struct ScreenshotRequest {
    pub url: Url,
    pub delay: Duration,
    pub viewport: Viewport,
    pub full_page: bool,
}

/// A validated batch request. Entries failing URL validation have already
/// been dropped; the list is never empty.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub urls: Vec<Url>,
}

/// Parse an absolute http(s) URL. Any other scheme is rejected.
pub fn parse_web_url(raw: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ValidationError::InvalidUrl),
    }
}

/// Validate a single-screenshot query against the configured default viewport.
///
/// Dimension fallback: one of width/height present fills the other from the
/// fixed 800x600 defaults; neither present uses the configured desktop
/// viewport unchanged.
pub fn parse_screenshot_query(
    query: &ScreenshotQuery,
    default_viewport: &Viewport,
) -> Result<ScreenshotRequest, ValidationError> {
    let url = parse_web_url(query.url.as_deref().ok_or(ValidationError::MissingUrl)?)?;

    let delay = match query.delay.as_deref() {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ValidationError::InvalidDelay)?,
        None => Duration::ZERO,
    };

    let width = parse_dimension(query.width.as_deref())?;
    let height = parse_dimension(query.height.as_deref())?;

    // Accepted literals only; anything else is a client error, not a truthy
    // coercion.
    let full_page = match query.full_page.as_deref() {
        None | Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        Some(_) => return Err(ValidationError::InvalidFullPage),
    };

    let viewport = match (width, height) {
        (None, None) => default_viewport.clone(),
        (width, height) => Viewport {
            width: width.unwrap_or(PARTIAL_DEFAULT_WIDTH),
            height: height.unwrap_or(PARTIAL_DEFAULT_HEIGHT),
            ..default_viewport.clone()
        },
    };

    Ok(ScreenshotRequest {
        url,
        delay,
        viewport,
        full_page,
    })
}

fn parse_dimension(raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(ValidationError::InvalidDimensions),
        },
    }
}

/// Validate a batch query.
///
/// The comma-separated list is trimmed and empty tokens discarded; tokens
/// failing URL validation are dropped silently rather than reported. Only a
/// fully empty result is an error.
pub fn parse_batch_query(query: &BatchQuery) -> Result<BatchRequest, ValidationError> {
    let raw = query.urls.as_deref().ok_or(ValidationError::MissingUrls)?;

    let urls: Vec<Url> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| parse_web_url(token).ok())
        .collect();

    if urls.is_empty() {
        return Err(ValidationError::NoValidUrls);
    }

    Ok(BatchRequest { urls })
}
