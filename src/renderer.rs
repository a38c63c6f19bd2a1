//! Single-URL capture against a dedicated browser instance
//!
//! Each capture acquires its own Chrome process and releases it before
//! returning, on success and failure alike. Sharing a browser across several
//! pages is the batch orchestrator's job; the page-level capture primitive
//! here is common to both.

use crate::{create_browser_config, CaptureError, Config, ScreenshotRequest, Viewport};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// A browser plus the task draining its CDP event stream.
///
/// The mutex exists because `Browser::close` needs exclusive access and batch
/// captures share one instance across tasks; page operations themselves only
/// borrow it briefly to create the page.
pub(crate) type SharedBrowser = Arc<Mutex<Browser>>;

/// Launch a Chrome instance and spawn its CDP handler loop.
///
/// The handler stream must be polled for the browser to make any progress;
/// the returned task does exactly that until the browser goes away.
pub(crate) async fn launch_browser(
    config: &Config,
) -> Result<(SharedBrowser, JoinHandle<()>), CaptureError> {
    let browser_config = create_browser_config(config)?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| CaptureError::BrowserLaunchFailed(e.to_string()))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("Browser handler error: {e}");
            }
        }
        debug!("Browser handler stream ended");
    });

    Ok((Arc::new(Mutex::new(browser)), handler_task))
}

/// Close the browser and stop its handler task. Close failures are logged and
/// swallowed so they never mask the error that ended the capture.
pub(crate) async fn shutdown_browser(browser: SharedBrowser, handler_task: JoinHandle<()>) {
    if let Err(e) = browser.lock().await.close().await {
        warn!("Failed to close browser cleanly: {e}");
    }
    handler_task.abort();
}

/// Open a page on `browser`, render `url`, and return the PNG bytes.
///
/// The page is closed before returning, whatever the outcome. Navigation is
/// bounded by `navigation_timeout`; chromiumoxide's lifecycle wait provides
/// the network-idle heuristic.
pub(crate) async fn capture_page(
    browser: &Mutex<Browser>,
    url: &url::Url,
    viewport: &Viewport,
    full_page: bool,
    delay: Duration,
    navigation_timeout: Duration,
) -> Result<Vec<u8>, CaptureError> {
    let page = {
        let browser = browser.lock().await;
        browser
            .new_page(url.as_str())
            .await
            .map_err(|e| CaptureError::PageError(e.to_string()))?
    };

    let result = drive_page(&page, viewport, full_page, delay, navigation_timeout).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close page cleanly: {e}");
    }

    result
}

async fn drive_page(
    page: &Page,
    viewport: &Viewport,
    full_page: bool,
    delay: Duration,
    navigation_timeout: Duration,
) -> Result<Vec<u8>, CaptureError> {
    let emulation = SetDeviceMetricsOverrideParams::builder()
        .width(viewport.width)
        .height(viewport.height)
        .device_scale_factor(viewport.device_scale_factor)
        .mobile(viewport.mobile)
        .build()
        .map_err(CaptureError::PageError)?;

    page.execute(emulation)
        .await
        .map_err(|e| CaptureError::PageError(e.to_string()))?;

    timeout(navigation_timeout, page.wait_for_navigation())
        .await
        .map_err(|_| CaptureError::NavigationTimeout(navigation_timeout))?
        .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;

    // Let late-loading content settle before capturing.
    if !delay.is_zero() {
        sleep(delay).await;
    }

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(full_page)
        .build();

    page.screenshot(params)
        .await
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))
}

/// Renders one validated request with a browser of its own.
pub struct Renderer {
    config: Config,
}

impl Renderer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Capture `request` as a PNG buffer.
    ///
    /// Browser acquisition and release bracket the capture; the instance is
    /// gone by the time this returns.
    pub async fn capture(&self, request: &ScreenshotRequest) -> Result<Vec<u8>, CaptureError> {
        debug!("Launching browser for {}", request.url);
        let (browser, handler_task) = launch_browser(&self.config).await?;

        let result = capture_page(
            &browser,
            &request.url,
            &request.viewport,
            request.full_page,
            request.delay,
            self.config.navigation_timeout,
        )
        .await;

        shutdown_browser(browser, handler_task).await;

        result
    }
}
