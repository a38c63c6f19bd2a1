//! Concurrent multi-URL capture over one shared browser
//!
//! A batch launches exactly one Chrome instance and fans the capture out over
//! concurrent pages, one per URL. Results are reassembled in input order via
//! their original index; a single failed capture fails the whole batch, but
//! only after every task has finished and the browser is closed.

use crate::renderer::{capture_page, launch_browser, shutdown_browser};
use crate::{CaptureError, Config};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// One successful capture within a batch.
#[derive(Debug)]
pub struct CaptureResult {
    pub url: Url,
    pub index: usize,
    pub data: Vec<u8>,
}

/// Capture every URL as a full-page PNG at the configured desktop viewport.
///
/// Batch mode does not honor per-item delay/viewport/fullPage options; those
/// are single-request-only. Output order matches input order regardless of
/// which capture finishes first.
pub async fn capture_all(
    config: &Config,
    urls: &[Url],
) -> Result<Vec<CaptureResult>, CaptureError> {
    debug!("Launching shared browser for batch of {} urls", urls.len());
    let (browser, handler_task) = launch_browser(config).await?;

    let tasks: Vec<_> = urls
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, url)| {
            let browser = Arc::clone(&browser);
            let viewport = config.viewport.clone();
            let navigation_timeout = config.navigation_timeout;

            tokio::spawn(async move {
                capture_page(
                    &browser,
                    &url,
                    &viewport,
                    true,
                    Duration::ZERO,
                    navigation_timeout,
                )
                .await
                .map(|data| CaptureResult { url, index, data })
            })
        })
        .collect();

    // All tasks run to completion before the browser goes away, even when
    // some of them failed.
    let joined = try_join_all(tasks).await;
    shutdown_browser(browser, handler_task).await;

    let mut results = joined
        .map_err(|e| CaptureError::TaskFailed(e.to_string()))?
        .into_iter()
        .collect::<Result<Vec<_>, CaptureError>>()?;

    // Concurrent captures finish out of order; slot them back by index.
    results.sort_by_key(|result| result.index);

    Ok(results)
}
