//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::net::TcpListener;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ARCHIVE_PATH: &str = "/HPImageArchive.aspx";

/// Set to `1` to fail, not skip, when localhost cannot be bound.
const REQUIRE_SOCKETS_ENV: &str = "BING_WALLPAPER_REQUIRE_SOCKET_TESTS";

/// Starts a mock archive server, or returns `None` in sandboxes where
/// localhost cannot be bound.
pub async fn mock_archive() -> Option<MockServer> {
    if let Err(error) = TcpListener::bind("127.0.0.1:0") {
        let required = std::env::var(REQUIRE_SOCKETS_ENV).is_ok_and(|value| value == "1");
        assert!(!required, "cannot bind localhost for the mock archive: {error}");
        eprintln!("skipping: cannot bind localhost for the mock archive ({error})");
        return None;
    }
    Some(MockServer::start().await)
}

/// Start date of the record `days_ago` days before 2024-01-15.
pub fn start_date(days_ago: u32) -> String {
    format!("202401{:02}", 15 - days_ago)
}

/// One archive record whose image lives at `/th?id=day{n}_1920x1080.jpg`.
pub fn image_record(days_ago: u32) -> Value {
    json!({
        "startdate": start_date(days_ago),
        "fullstartdate": format!("{}1600", start_date(days_ago)),
        "enddate": start_date(days_ago.saturating_sub(1)),
        "url": format!("/th?id=day{days_ago}_1920x1080.jpg&rf=LaDigue_1920x1080.jpg"),
        "urlbase": format!("/th?id=day{days_ago}"),
        "copyright": format!("Scene {days_ago}, Somewhere (© Photographer)"),
        "copyrightlink": "https://www.bing.com/search?q=scene",
        "title": format!("Scene {days_ago}"),
        "quiz": "/search?q=Bing+homepage+quiz",
        "wp": true,
        "hsh": format!("hash{days_ago}"),
        "drk": 1,
        "top": 1,
        "bot": 1,
        "hs": []
    })
}

/// Archive body holding `count` records starting `days_ago` days back.
pub fn archive_body(days_ago: u32, count: u32) -> Value {
    let images: Vec<Value> = (days_ago..days_ago + count).map(image_record).collect();
    json!({
        "images": images,
        "tooltips": {
            "loading": "Loading...",
            "previous": "Previous image",
            "next": "Next image",
            "walle": "This image is not available to download as wallpaper.",
            "walls": "Download this image."
        }
    })
}

/// Serves `archive_body(idx, n)` for `GET {ARCHIVE_PATH}?n={n}&idx={idx}`.
pub async fn mount_archive(server: &MockServer, days_ago: u32, count: u32) {
    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .and(query_param("n", count.to_string()))
        .and(query_param("idx", days_ago.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(days_ago, count)))
        .mount(server)
        .await;
}

/// Serves UHD image bytes `jpeg day{n}` for each of the first `count` days.
pub async fn mount_images(server: &MockServer, count: u32) {
    for days_ago in 0..count {
        Mock::given(method("GET"))
            .and(path("/th"))
            .and(query_param("id", format!("day{days_ago}_UHD.jpg")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(format!("jpeg day{days_ago}").into_bytes())
                    .insert_header("Content-Type", "image/jpeg"),
            )
            .mount(server)
            .await;
    }
}

/// Archive endpoint URL on `server`.
pub fn archive_url(server: &MockServer) -> String {
    format!("{}{ARCHIVE_PATH}", server.uri())
}
