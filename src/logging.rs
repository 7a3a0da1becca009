//! Logging utilities wrapping `tracing` initialisation
//!
//! Nothing here installs a global subscriber. [`init`] builds a [`LogHandle`]
//! that the entry point owns; work executed inside [`LogHandle::scope`] logs to
//! it. Lines carry an RFC 3339 timestamp, the level, and the message.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing::{Dispatch, Subscriber};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// An assembled logger.
///
/// Holds the subscriber and, when a log file is configured, the guard of its
/// background writer. Dropping the handle flushes the file.
pub struct LogHandle {
    dispatch: Dispatch,
    _file_guard: Option<WorkerGuard>,
}

impl LogHandle {
    /// Run `f` with this logger as the active subscriber on the current thread.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("file", &self._file_guard.is_some())
            .finish()
    }
}

/// Build a logger writing to stderr (and the configured file, if any).
pub fn init(options: &LoggingOptions) -> Result<LogHandle> {
    with_writer(options, io::stderr)
}

/// Build a logger whose console output goes to `writer`.
pub fn with_writer<W>(options: &LoggingOptions, writer: W) -> Result<LogHandle>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_new(options.level.as_str())
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {e}", options.level)))?;

    let (file_layer, guard) = match file_layer::<LayeredEnvFilter>(options)? {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };

    let subscriber = Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer(writer, options.color));

    Ok(LogHandle {
        dispatch: Dispatch::new(subscriber),
        _file_guard: guard,
    })
}

type LayeredEnvFilter = Layered<EnvFilter, Registry>;
type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn file_layer<S>(options: &LoggingOptions) -> Result<Option<(BoxedLayer<S>, WorkerGuard)>>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    let path = match options.file.as_ref() {
        Some(path) => path,
        None => return Ok(None),
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let (non_blocking, guard) = match options.rotation {
        Some(rotation) => {
            let file_name = path.file_name().ok_or_else(|| {
                Error::Config(format!(
                    "Log file path '{}' must include a filename when rotation is enabled",
                    path.display()
                ))
            })?;

            let appender = match rotation {
                LogRotation::Hourly => rolling::hourly(dir, file_name),
                LogRotation::Daily => rolling::daily(dir, file_name),
            };

            non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(appender)
        }
        None => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;

            non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file)
        }
    };

    let layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_target(false)
        .with_level(true)
        .boxed();

    Ok(Some((layer, guard)))
}

fn console_layer<S, W>(writer: W, color: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer)
        .with_ansi(color)
        .with_target(false)
        .with_level(true)
        .boxed()
}
