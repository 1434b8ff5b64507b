//! Constants for the archive client (endpoint, limits, timeouts).

use std::time::Duration;

/// Default archive endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.bing.com/HPImageArchive.aspx";

/// Default market/locale sent as `mkt`.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of days of history the archive serves.
pub const MAX_ARCHIVE_DAYS: u32 = 16;

/// Resolution token embedded in standard image URLs.
pub const STANDARD_RESOLUTION_TOKEN: &str = "1920x1080";

/// Token requesting the highest available resolution.
pub const UHD_RESOLUTION_TOKEN: &str = "UHD";

/// Desktop browser User-Agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
