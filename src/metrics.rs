use metrics::{register_counter, register_histogram, Counter, Histogram};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// Request-level counters and timings for the screenshot endpoints.
///
/// Handles are registered once at startup; with no exporter installed they
/// degrade to no-ops, so tests and metrics-less deployments pay nothing.
pub struct Metrics {
    screenshots_taken: Counter,
    screenshots_failed: Counter,
    screenshot_duration: Histogram,
    batches_taken: Counter,
    batches_failed: Counter,
    batch_duration: Histogram,
    validation_failures: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            screenshots_taken: register_counter!("screenshots_taken_total"),
            screenshots_failed: register_counter!("screenshots_failed_total"),
            screenshot_duration: register_histogram!("screenshot_duration_seconds"),
            batches_taken: register_counter!("batch_screenshots_taken_total"),
            batches_failed: register_counter!("batch_screenshots_failed_total"),
            batch_duration: register_histogram!("batch_screenshot_duration_seconds"),
            validation_failures: register_counter!("validation_failures_total"),
        }
    }

    pub fn record_screenshot(&self, duration: Duration, success: bool) {
        if success {
            self.screenshots_taken.increment(1);
        } else {
            self.screenshots_failed.increment(1);
        }
        self.screenshot_duration.record(duration.as_secs_f64());
    }

    pub fn record_batch(&self, duration: Duration, success: bool) {
        if success {
            self.batches_taken.increment(1);
        } else {
            self.batches_failed.increment(1);
        }
        self.batch_duration.record(duration.as_secs_f64());
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the Prometheus recorder with its HTTP scrape listener.
///
/// Must run inside the Tokio runtime, before any [`Metrics`] handles are
/// registered.
pub fn install_prometheus_exporter(
    addr: SocketAddr,
) -> Result<(), metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Prometheus metrics exporter listening on {addr}");
    Ok(())
}
