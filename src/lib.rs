//! # Screenshot Server
//!
//! An HTTP façade that turns URLs into rendered screenshots by driving
//! headless Chrome. A single endpoint captures one page as a PNG; a batch
//! endpoint fans the same capture out over several URLs concurrently and
//! bundles the results into a zip archive.
//!
//! ## Endpoints
//!
//! | Route | Query parameters | Success | Failure |
//! |-------|------------------|---------|---------|
//! | `GET /screenshot` | `url` (required), `delay`, `width`, `height`, `fullPage` | `200` `image/png` | `400`/`500` JSON `{error}` |
//! | `GET /batch-screenshot` | `urls` (comma-separated) | `200` `application/zip` | `400`/`500` JSON `{error}` |
//!
//! Unmatched routes are served by a configurable fallback: a bare `404`
//! (default) or a static directory with single-page-app `index.html`
//! fallback.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use screenshot_server::{build_router, Config, Metrics};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let app = build_router(Arc::clone(&config), Arc::new(Metrics::new()));
//!
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//!     axum::serve(listener, app.into_make_service()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # API-only server on the default port 3000
//! screenshot-server
//!
//! # Front a bundled web client and expose Prometheus metrics
//! screenshot-server --static-dir public --metrics-addr 127.0.0.1:9090
//! ```

/// Configuration, viewport defaults, and Chrome launch settings
pub mod config;

/// Error types for validation, capture, and the HTTP boundary
pub mod error;

/// Query-parameter validation producing typed requests
pub mod validate;

/// Single-URL capture against a dedicated browser instance
pub mod renderer;

/// Concurrent multi-URL capture over one shared browser
pub mod batch;

/// Zip assembly for batch responses
pub mod archive;

/// HTTP routing, handlers, and response shaping
pub mod server;

/// Request metrics and the Prometheus exporter
pub mod metrics;

#[cfg(test)]
mod tests;

pub use archive::*;
pub use batch::*;
pub use config::*;
pub use error::*;
pub use metrics::*;
pub use renderer::*;
pub use server::*;
pub use validate::*;
