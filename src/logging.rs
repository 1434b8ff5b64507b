//! Explicit, injectable logging built on `tracing`.
//!
//! Components never install a global subscriber. Each one holds a [`Logger`]
//! (a cloneable [`tracing::Dispatch`]) and runs its work inside it, so the
//! `tracing` macros in that work reach only that logger. [`Logger::none`] is
//! the default and discards everything. The level can be changed after
//! construction with [`Logger::set_level`], which all clones observe.
//!
//! # Example
//!
//! ```
//! use bing_wallpaper_core::logging::{LogConfig, LogLevel, Logger};
//!
//! let logger = Logger::new(&LogConfig {
//!     level: LogLevel::Debug,
//!     show_time: false,
//!     ..LogConfig::default()
//! });
//! logger.in_scope(|| tracing::info!("hello"));
//! ```

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::Dispatch;
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Minimum severity a [`Logger`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal progress messages.
    #[default]
    Info,
    /// Recoverable problems.
    Warning,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Returns the `EnvFilter` directive for this level.
    #[must_use]
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Error returned when a log level label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected debug, info, warning or error)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(ParseLogLevelError(other.to_string())),
        }
    }
}

/// Formatting options for a [`Logger`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level emitted.
    pub level: LogLevel,
    /// Prefix each line with a timestamp.
    pub show_time: bool,
    /// Include the level tag in each line.
    pub show_level: bool,
    /// Raw `EnvFilter` directives that take precedence over `level`
    /// (typically the value of `RUST_LOG`).
    pub directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            show_time: true,
            show_level: true,
            directives: None,
        }
    }
}

impl LogConfig {
    fn env_filter(&self) -> EnvFilter {
        self.directives
            .as_deref()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level.as_directive()))
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// A leveled text sink passed explicitly to every component.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    filter: Option<FilterHandle>,
    level: Arc<RwLock<LogLevel>>,
}

impl Logger {
    /// Creates a logger that writes formatted lines to stdout.
    #[must_use]
    pub fn new(config: &LogConfig) -> Self {
        Self::with_writer(config, std::io::stdout)
    }

    /// Creates a logger that writes formatted lines to `writer`.
    #[must_use]
    pub fn with_writer<W>(config: &LogConfig, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let (filter, handle) = reload::Layer::new(config.env_filter());
        let format = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_level(config.show_level);
        let registry = tracing_subscriber::registry().with(filter);

        let dispatch = if config.show_time {
            Dispatch::new(registry.with(format))
        } else {
            Dispatch::new(registry.with(format.without_time()))
        };
        Self {
            dispatch,
            filter: Some(handle),
            level: Arc::new(RwLock::new(config.level)),
        }
    }

    /// Creates a logger that discards everything.
    #[must_use]
    pub fn none() -> Self {
        Self {
            dispatch: Dispatch::none(),
            filter: None,
            level: Arc::default(),
        }
    }

    /// Returns the level last configured or set.
    ///
    /// Directives given in [`LogConfig::directives`] are not reflected here.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the minimum level emitted by this logger and its clones.
    ///
    /// Replaces any directives the logger was built with.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying subscriber is gone.
    pub fn set_level(&self, level: LogLevel) -> Result<(), reload::Error> {
        if let Some(filter) = &self.filter {
            filter.reload(EnvFilter::new(level.as_directive()))?;
        }
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
        Ok(())
    }

    /// Runs `f` with this logger receiving its events.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Wraps `future` so this logger receives its events while it is polled.
    pub fn instrument<F: Future>(&self, future: F) -> WithDispatch<F> {
        future.with_subscriber(self.dispatch.clone())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}
