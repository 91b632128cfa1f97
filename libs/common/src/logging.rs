//! Unified logging module for VoltageEMS tools
//!
//! Console output uses the bracketed `timestamp [LEVEL] message` format; an
//! optional daily rolling file sink is written through a non-blocking worker.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{
        self,
        format::Writer,
        FmtContext, FormatEvent, FormatFields,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::error::{Error, Result};

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Custom event formatter that outputs: `timestamp [LEVEL] message`
///
/// Example output: `2025-12-02T00:50:44.809Z [INFO] Allocated backing store length=16`
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// Keeps the non-blocking file worker alive for the life of the process
static GUARDS: OnceLock<Mutex<Vec<WorkerGuard>>> = OnceLock::new();

type EnvFilterReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;
static LOG_FILTER_HANDLE: OnceLock<EnvFilterReloadHandle> = OnceLock::new();
static CURRENT_LOG_LEVEL: OnceLock<Mutex<String>> = OnceLock::new();

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Tool name, used as the file prefix (e.g., "bufscope")
    pub service_name: String,
    /// Filter used when RUST_LOG is not set
    pub level: String,
    /// Directory for the daily rolling file; console only when `None`
    pub log_dir: Option<PathBuf>,
    /// Colored level tags on the console
    pub enable_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".to_string(),
            level: "info".to_string(),
            log_dir: None,
            enable_ansi: true,
        }
    }
}

/// Build the filter: RUST_LOG wins, otherwise `default_level`
pub fn build_filter(default_level: &str) -> Result<(EnvFilter, String)> {
    let spec = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_level.to_string());
    let filter = EnvFilter::try_new(&spec)
        .map_err(|e| Error::Logging(format!("Invalid log filter '{}': {}", spec, e)))?;
    Ok((filter, spec))
}

/// Initialize logging system with configuration
pub fn init_with_config(config: LogConfig) -> Result<()> {
    let (env_filter, initial_level) = build_filter(&config.level)?;

    let (reload_filter, reload_handle) = reload::Layer::new(env_filter);
    let _ = LOG_FILTER_HANDLE.set(reload_handle);
    let _ = CURRENT_LOG_LEVEL.set(Mutex::new(initial_level));

    let console_layer = fmt::layer()
        .with_ansi(config.enable_ansi)
        .with_writer(std::io::stderr)
        .event_format(BracketedLevelFormat)
        .boxed();

    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender =
                tracing_appender::rolling::daily(dir, format!("{}.log", config.service_name));
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            let guards = GUARDS.get_or_init(|| Mutex::new(Vec::new()));
            match guards.lock() {
                Ok(mut guards) => guards.push(guard),
                Err(poisoned) => poisoned.into_inner().push(guard),
            }

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .event_format(BracketedLevelFormat)
                    .boxed(),
            )
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(reload_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::debug!(service = %config.service_name, "Logging initialized");
    Ok(())
}

/// Drop the file workers, flushing buffered lines to disk
///
/// Call before the process exits; file logging stops afterwards.
pub fn flush() {
    if let Some(guards) = GUARDS.get() {
        match guards.lock() {
            Ok(mut guards) => guards.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

/// Dynamically set log filter level at runtime
///
/// Accepts a level ("debug") or a full filter spec ("info,voltage_buffer=trace").
pub fn set_log_level(level: &str) -> Result<()> {
    let handle = LOG_FILTER_HANDLE
        .get()
        .ok_or_else(|| Error::Logging("Logging not initialized with reload support".to_string()))?;

    let new_filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Logging(format!("Invalid log level '{}': {}", level, e)))?;

    handle
        .reload(new_filter)
        .map_err(|e| Error::Logging(format!("Failed to reload log filter: {}", e)))?;

    if let Some(current) = CURRENT_LOG_LEVEL.get() {
        if let Ok(mut guard) = current.lock() {
            *guard = level.to_string();
        }
    }

    tracing::info!("Log level changed to: {}", level);
    Ok(())
}

/// Get current log filter level
pub fn get_log_level() -> String {
    CURRENT_LOG_LEVEL
        .get()
        .and_then(|m| m.lock().ok())
        .map(|guard| guard.clone())
        .unwrap_or_else(|| "unknown".to_string())
}
