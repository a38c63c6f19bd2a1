//! Configuration management with serde serialization/deserialization
//!
//! This module provides all configuration structures for the screenshot server,
//! including viewport defaults, request limits, the unmatched-route fallback
//! strategy, and Chrome launch settings.

use crate::CaptureError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the screenshot server
///
/// Controls the HTTP listener, per-request rendering limits, and the Chrome
/// launch environment. Every field has a default, so a config file only needs
/// to name the fields it overrides.
///
/// # Examples
///
/// ```rust
/// use screenshot_server::Config;
///
/// // Use default configuration
/// let config = Config::default();
///
/// // Create custom configuration
/// let config = Config {
///     port: 8080,
///     max_concurrent_requests: 32,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP listener binds to (default: 0.0.0.0)
    pub host: String,

    /// Port the HTTP listener binds to (default: 3000)
    pub port: u16,

    /// Hard limit on page navigation, including the network-idle wait
    /// (default: 30 seconds)
    ///
    /// Navigations that take longer are treated as failed; the request is
    /// answered with a rendering error.
    pub navigation_timeout: Duration,

    /// Overall timeout applied to every HTTP request (default: 120 seconds)
    ///
    /// Must leave room for navigation plus any client-requested capture delay.
    pub request_timeout: Duration,

    /// Maximum number of HTTP requests served concurrently
    /// (default: 4 per CPU core)
    ///
    /// Each in-flight capture owns a Chrome process, so this is the primary
    /// knob for bounding memory use.
    pub max_concurrent_requests: usize,

    /// Viewport used when a request specifies no dimensions, and for every
    /// page in a batch capture
    pub viewport: Viewport,

    /// Path to Chrome/Chromium executable (default: auto-detect)
    pub chrome_path: Option<String>,

    /// Origins allowed by the CORS layer (default: any origin)
    pub allowed_origins: Vec<String>,

    /// What to serve for routes outside the screenshot API
    pub fallback: FallbackStrategy,

    /// Listen address for the Prometheus metrics exporter (default: disabled)
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            navigation_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            max_concurrent_requests: num_cpus::get().saturating_mul(4),
            viewport: Viewport::default(),
            chrome_path: None,
            allowed_origins: vec!["*".to_string()],
            fallback: FallbackStrategy::default(),
            metrics_addr: None,
        }
    }
}

/// Browser viewport configuration for screenshots
///
/// Controls the simulated window size and display characteristics used when
/// rendering pages.
///
/// # Examples
///
/// ```rust
/// use screenshot_server::Viewport;
///
/// // Desktop viewport (default)
/// let desktop = Viewport::default();
///
/// // Mobile viewport
/// let mobile = Viewport {
///     width: 375,
///     height: 667,
///     device_scale_factor: 2.0,
///     mobile: true,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Viewport {
    /// Viewport width in pixels (default: 1920)
    pub width: u32,

    /// Viewport height in pixels (default: 1080)
    pub height: u32,

    /// Device pixel ratio for high-DPI displays (default: 1.0)
    pub device_scale_factor: f64,

    /// Whether to emulate a mobile device (default: false)
    pub mobile: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            device_scale_factor: 1.0,
            mobile: false,
        }
    }
}

/// Behavior for GET requests that match no API route
///
/// Two deployments exist in the wild: one that fronts a bundled web client and
/// one that is API-only. Both are supported; the API-only 404 variant is the
/// default since this crate ships no frontend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Answer unmatched routes with a bare 404
    #[default]
    NotFound,
    /// Serve files from `dir`, falling back to its `index.html` for unknown
    /// paths (single-page-app routing)
    StaticDir { dir: PathBuf },
}

/// Generate Chrome command-line arguments for a single browser launch
///
/// Each launch gets a unique user-data directory so that concurrently running
/// Chrome processes never contend for a profile lock.
pub fn get_chrome_args(config: &Config) -> Vec<String> {
    let unique_id = format!("{}-{}", std::process::id(), uuid::Uuid::new_v4());

    vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--no-first-run".to_string(),
        "--hide-scrollbars".to_string(),
        "--mute-audio".to_string(),
        format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        ),
        format!("--user-data-dir=/tmp/screenshot-server-{unique_id}"),
    ]
}

/// Build the chromiumoxide launch configuration for one browser instance
pub fn create_browser_config(
    config: &Config,
) -> Result<chromiumoxide::browser::BrowserConfig, CaptureError> {
    use chromiumoxide::browser::BrowserConfig;

    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport.width, config.viewport.height)
        .args(get_chrome_args(config));

    if let Some(chrome_path) = &config.chrome_path {
        builder = builder.chrome_executable(chrome_path);
    }

    builder.build().map_err(CaptureError::BrowserLaunchFailed)
}
