//! `reqwest`-backed implementation of [`WallpaperSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info};
use url::Url;

use super::config::ClientConfig;
use super::constants::{STANDARD_RESOLUTION_TOKEN, UHD_RESOLUTION_TOKEN};
use super::{WallpaperSource, validate_day_count};
use crate::archive::{ArchiveResponse, ImageMetadata};
use crate::error::WallpaperError;
use crate::logging::Logger;

/// HTTP client for the image archive.
///
/// Build it once and reuse it; the underlying connection pool and the
/// request timeout are fixed at construction.
#[derive(Debug, Clone)]
pub struct BingClient {
    client: Client,
    base_url: Url,
    image_host: Url,
    locale: String,
    high_quality: bool,
    timeout: Duration,
    logger: Logger,
}

impl BingClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::InvalidUrl`] if the base URL or image host
    /// cannot be parsed, and [`WallpaperError::ClientBuild`] if the HTTP
    /// client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, WallpaperError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| WallpaperError::invalid_url(&config.base_url))?;
        let image_host = match config.image_host.as_deref() {
            Some(host) => Url::parse(host).map_err(|_| WallpaperError::invalid_url(host))?,
            None => base_url
                .join("/")
                .map_err(|_| WallpaperError::invalid_url(&config.base_url))?,
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(WallpaperError::client_build)?;

        Ok(Self {
            client,
            base_url,
            image_host,
            locale: config.locale,
            high_quality: config.high_quality,
            timeout: config.timeout,
            logger: config.logger,
        })
    }

    /// Per-request timeout this client was built with.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves the absolute image URL for `image`.
    ///
    /// In high-quality mode the first `1920x1080` token becomes `UHD`.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::InvalidUrl`] when the record has no URL or
    /// it cannot be resolved against the image host.
    pub fn image_url(&self, image: &ImageMetadata) -> Result<String, WallpaperError> {
        if image.url.trim().is_empty() {
            return Err(WallpaperError::invalid_url(&image.url));
        }
        let resolved = self
            .image_host
            .join(&image.url)
            .map_err(|_| WallpaperError::invalid_url(&image.url))?;
        let url = String::from(resolved);
        if self.high_quality {
            Ok(url.replacen(STANDARD_RESOLUTION_TOKEN, UHD_RESOLUTION_TOKEN, 1))
        } else {
            Ok(url)
        }
    }

    async fn send_request(&self, url: &str) -> Result<Vec<u8>, WallpaperError> {
        debug!(url, "sending GET request");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(url, error = %e, "request failed");
            WallpaperError::network(url, e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(url, status = status.as_u16(), "unexpected HTTP status");
            return Err(WallpaperError::http_status(url, status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            error!(url, error = %e, "failed to read response body");
            WallpaperError::network(url, e)
        })?;

        debug!(url, bytes = body.len(), "received response");
        Ok(body.to_vec())
    }

    async fn fetch_archive(
        &self,
        days_ago: u32,
        count: u32,
    ) -> Result<Vec<ImageMetadata>, WallpaperError> {
        let url = self.archive_url(days_ago, count);
        info!(days_ago, count, url = %url, "fetching wallpaper metadata");

        let body = self.send_request(&url).await?;
        let images = parse_archive(&url, &body)?;

        info!(images = images.len(), "fetched wallpaper metadata");
        Ok(images)
    }
}

/// Decodes an archive body, rejecting bodies without images.
fn parse_archive(url: &str, body: &[u8]) -> Result<Vec<ImageMetadata>, WallpaperError> {
    debug!(bytes = body.len(), "parsing archive response");

    let response: ArchiveResponse = serde_json::from_slice(body).map_err(|e| {
        error!(url, error = %e, "failed to decode archive response");
        WallpaperError::parse(url, e)
    })?;

    if response.images.is_empty() {
        error!(url, "archive response contained no images");
        return Err(WallpaperError::empty_archive(url));
    }
    Ok(response.images)
}

#[async_trait]
impl WallpaperSource for BingClient {
    async fn fetch_image_data(&self, days_ago: u32) -> Result<ImageMetadata, WallpaperError> {
        self.logger
            .instrument(async {
                let url = self.archive_url(days_ago, 1);
                let image = self
                    .fetch_archive(days_ago, 1)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| WallpaperError::empty_archive(url))?;
                debug!(title = %image.title, start_date = %image.start_date, "wallpaper metadata");
                Ok::<_, WallpaperError>(image)
            })
            .await
    }

    async fn fetch_multiple_image_data(
        &self,
        days: u32,
    ) -> Result<Vec<ImageMetadata>, WallpaperError> {
        self.logger
            .instrument(async {
                validate_day_count(days).inspect_err(|e| error!(error = %e, "rejected day count"))?;
                self.fetch_archive(0, days).await
            })
            .await
    }

    async fn fetch_raw_image_data(&self, image: &ImageMetadata) -> Result<Vec<u8>, WallpaperError> {
        self.logger
            .instrument(async {
                let url = self.image_url(image)?;
                info!(url = %url, "fetching image");
                self.send_request(&url).await
            })
            .await
    }

    async fn fetch_raw_json_data(&self, url: &str) -> Result<Vec<u8>, WallpaperError> {
        self.logger
            .instrument(async {
                info!(url, "fetching raw metadata JSON");
                self.send_request(url).await
            })
            .await
    }

    fn archive_url(&self, days_ago: u32, count: u32) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "js")
            .append_pair("n", &count.to_string())
            .append_pair("idx", &days_ago.to_string())
            .append_pair("mkt", &self.locale);
        url.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn image_with_url(url: &str) -> ImageMetadata {
        ImageMetadata {
            url: url.to_string(),
            ..ImageMetadata::default()
        }
    }

    #[test]
    fn test_archive_url_layout() {
        let client = BingClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.archive_url(3, 1),
            "https://www.bing.com/HPImageArchive.aspx?format=js&n=1&idx=3&mkt=zh-CN"
        );
    }

    #[test]
    fn test_archive_url_is_stable() {
        let client =
            BingClient::new(ClientConfig::default().with_locale("en-US")).unwrap();
        assert_eq!(client.archive_url(0, 8), client.archive_url(0, 8));
        assert!(client.archive_url(0, 8).ends_with("n=8&idx=0&mkt=en-US"));
    }

    #[test]
    fn test_image_url_substitutes_uhd_in_high_quality_mode() {
        let client = BingClient::new(ClientConfig::default()).unwrap();
        let url = client
            .image_url(&image_with_url(
                "/th?id=OHR.Aurora_ZH-CN1234_1920x1080.jpg&rf=LaDigue_1920x1080.jpg",
            ))
            .unwrap();
        assert_eq!(
            url,
            "https://www.bing.com/th?id=OHR.Aurora_ZH-CN1234_UHD.jpg&rf=LaDigue_1920x1080.jpg"
        );
    }

    #[test]
    fn test_image_url_keeps_resolution_without_high_quality() {
        let client =
            BingClient::new(ClientConfig::default().with_high_quality(false)).unwrap();
        let url = client
            .image_url(&image_with_url("/th?id=OHR.Aurora_1920x1080.jpg"))
            .unwrap();
        assert_eq!(url, "https://www.bing.com/th?id=OHR.Aurora_1920x1080.jpg");
    }

    #[test]
    fn test_image_url_uses_explicit_image_host() {
        let client = BingClient::new(
            ClientConfig::default()
                .with_base_url("http://127.0.0.1:8080/archive")
                .with_image_host("http://127.0.0.1:9090"),
        )
        .unwrap();
        let url = client.image_url(&image_with_url("/img/a_1920x1080.jpg")).unwrap();
        assert_eq!(url, "http://127.0.0.1:9090/img/a_UHD.jpg");
    }

    #[test]
    fn test_image_url_defaults_to_base_origin() {
        let client = BingClient::new(
            ClientConfig::default().with_base_url("http://127.0.0.1:8080/archive"),
        )
        .unwrap();
        let url = client.image_url(&image_with_url("/img/a.jpg")).unwrap();
        assert_eq!(url, "http://127.0.0.1:8080/img/a.jpg");
    }

    #[test]
    fn test_image_url_rejects_empty_url() {
        let client = BingClient::new(ClientConfig::default()).unwrap();
        let error = client.image_url(&image_with_url("  ")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let error = BingClient::new(ClientConfig::default().with_base_url("not a url")).unwrap_err();
        assert!(matches!(error, WallpaperError::InvalidUrl { .. }));
    }

    #[test]
    fn test_timeout_fixed_at_construction() {
        let client = BingClient::new(
            ClientConfig::default().with_timeout(Duration::from_secs(3)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_archive_rejects_empty_images() {
        let error = parse_archive("u", br#"{"images":[]}"#).unwrap_err();
        assert!(matches!(error, WallpaperError::EmptyArchive { .. }));
    }

    #[test]
    fn test_parse_archive_rejects_malformed_json() {
        let error = parse_archive("u", b"<html>").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_fetch_multiple_rejects_out_of_range_without_request() {
        // Unroutable base URL: any request would fail with a transport error.
        let client = BingClient::new(
            ClientConfig::default().with_base_url("http://127.0.0.1:9/archive"),
        )
        .unwrap();
        for days in [0, 17] {
            let error = client.fetch_multiple_image_data(days).await.unwrap_err();
            assert!(
                matches!(error, WallpaperError::InvalidDayCount { .. }),
                "days={days}: {error:?}"
            );
        }
    }
}
