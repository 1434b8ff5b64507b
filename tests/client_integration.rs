//! Integration tests for the archive client.
//!
//! These tests run the HTTP client against a mock archive.

mod support;

use std::time::Duration;

use bing_wallpaper_core::client::{BingClient, ClientConfig, WallpaperSource};
use bing_wallpaper_core::error::{ErrorKind, WallpaperError};
use support::{
    ARCHIVE_PATH, archive_url, image_record, mock_archive, mount_archive, start_date,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BingClient {
    BingClient::new(ClientConfig::default().with_base_url(archive_url(server)))
        .expect("client should build")
}

#[tokio::test]
async fn test_fetch_image_data_sends_archive_query() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .and(query_param("format", "js"))
        .and(query_param("n", "1"))
        .and(query_param("idx", "3"))
        .and(query_param("mkt", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::archive_body(3, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BingClient::new(
        ClientConfig::default()
            .with_base_url(archive_url(&mock_server))
            .with_locale("en-US"),
    )
    .unwrap();

    let image = client.fetch_image_data(3).await.expect("metadata should load");

    assert_eq!(image.start_date, start_date(3));
    assert_eq!(image.title, "Scene 3");
    assert!(image.wallpaper);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .and(header("user-agent", "wallpaper-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::archive_body(0, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BingClient::new(
        ClientConfig::default()
            .with_base_url(archive_url(&mock_server))
            .with_user_agent("wallpaper-test/1.0"),
    )
    .unwrap();

    let result = client.fetch_image_data(0).await;
    assert!(result.is_ok(), "request should match UA mock: {:?}", result.err());
}

#[tokio::test]
async fn test_fetch_multiple_returns_records_most_recent_first() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };
    let client = client_for(&mock_server);

    for days in 1..=16 {
        mount_archive(&mock_server, 0, days).await;

        let images = client
            .fetch_multiple_image_data(days)
            .await
            .unwrap_or_else(|e| panic!("batch metadata for {days} days should load: {e}"));

        assert_eq!(images.len(), days as usize);
        for (days_ago, image) in (0..).zip(&images) {
            assert_eq!(image.start_date, start_date(days_ago), "days={days}");
        }
    }
}

#[tokio::test]
async fn test_fetch_multiple_rejects_out_of_range_without_request() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    for days in [0, 17] {
        let error = client.fetch_multiple_image_data(days).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation, "days={days}");
    }
}

#[tokio::test]
async fn test_http_500_is_http_status_error() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server).fetch_image_data(0).await.unwrap_err();

    assert!(
        matches!(error, WallpaperError::HttpStatus { status: 500, .. }),
        "expected HttpStatus 500, got {error:?}"
    );
    assert_eq!(error.kind(), ErrorKind::HttpStatus);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server).fetch_image_data(0).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_empty_image_list_is_parse_error() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"images":[]}"#))
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server)
        .fetch_multiple_image_data(3)
        .await
        .unwrap_err();
    assert!(matches!(error, WallpaperError::EmptyArchive { .. }), "{error:?}");
}

#[tokio::test]
async fn test_slow_server_is_transport_error() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(support::archive_body(0, 1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = BingClient::new(
        ClientConfig::default()
            .with_base_url(archive_url(&mock_server))
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let error = client.fetch_image_data(0).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Transport, "{error:?}");
}

#[tokio::test]
async fn test_fetch_raw_image_data_requests_uhd_variant() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };
    support::mount_images(&mock_server, 1).await;

    let image = serde_json::from_value(image_record(0)).unwrap();
    let bytes = client_for(&mock_server)
        .fetch_raw_image_data(&image)
        .await
        .expect("UHD image should be served");

    assert_eq!(bytes, b"jpeg day0");
}

#[tokio::test]
async fn test_fetch_raw_json_data_returns_body_unmodified() {
    let Some(mock_server) = mock_archive().await else {
        return;
    };

    // Deliberately odd formatting: the body must come back byte-for-byte.
    let raw = "{ \"images\" : [ {\"startdate\":\"20240115\"} ] ,\n \"extra\": 1 }";
    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = client.archive_url(0, 1);
    let body = client.fetch_raw_json_data(&url).await.unwrap();

    assert_eq!(body, raw.as_bytes());
}
