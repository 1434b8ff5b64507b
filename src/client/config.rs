//! Construction-time settings for [`BingClient`](super::BingClient).

use std::time::Duration;

use super::constants::{DEFAULT_BASE_URL, DEFAULT_LOCALE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::logging::Logger;

/// Settings for an archive client.
///
/// Every field has a default; override the ones you need with struct update
/// syntax or the `with_*` setters.
///
/// ```
/// use std::time::Duration;
/// use bing_wallpaper_core::client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_locale("en-US")
///     .with_timeout(Duration::from_secs(15));
/// assert!(config.high_quality);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Archive endpoint, without query string.
    pub base_url: String,
    /// Host that relative image URLs resolve against. `None` uses the
    /// origin of `base_url`.
    pub image_host: Option<String>,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Market sent as `mkt`.
    pub locale: String,
    /// Request UHD images instead of 1920x1080.
    pub high_quality: bool,
    /// Sink for client log events.
    pub logger: Logger,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_host: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            high_quality: true,
            logger: Logger::none(),
        }
    }
}

impl ClientConfig {
    /// Sets the archive endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the host image URLs resolve against.
    #[must_use]
    pub fn with_image_host(mut self, image_host: impl Into<String>) -> Self {
        self.image_host = Some(image_host.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the market.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Enables or disables UHD substitution.
    #[must_use]
    pub fn with_high_quality(mut self, enabled: bool) -> Self {
        self.high_quality = enabled;
        self
    }

    /// Sets the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }
}
