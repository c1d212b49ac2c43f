//! Tracing setup for the command-line tool.
//!
//! Log records go to stderr so the result table on stdout stays clean, and
//! can additionally be appended to a file chosen after startup. The level
//! filter can be swapped at runtime through [`LoggingHandle`].

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

pub const DEFAULT_FILTER: &str = "info";

/// Local timestamp, coloured level, source location, then the fields.
struct LocalTimeFormat;

impl LocalTimeFormat {
    fn level_colour(level: Level) -> &'static str {
        match level {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            let colour = Self::level_colour(*meta.level());
            write!(writer, "\x1b[2m{timestamp}\x1b[0m {colour}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file.rsplit_once("src/").map_or(file, |(_, rest)| rest);
            write!(writer, "{file}:{line} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file that can be opened, replaced or closed after the subscriber is
/// installed. Writes are dropped while no file is set.
#[derive(Clone, Default)]
struct FileSlot(Arc<Mutex<Option<File>>>);

impl FileSlot {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

/// Builds a filter from an explicit directive, else `RUST_LOG`, else
/// [`DEFAULT_FILTER`].
pub fn make_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| anyhow!("invalid log level '{directive}': {e}")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Runtime controls for the installed subscriber.
#[derive(Clone)]
pub struct LoggingHandle {
    level: reload::Handle<EnvFilter, Registry>,
    file: FileSlot,
}

impl LoggingHandle {
    /// Accepts a bare level ("warn", "debug") or any `EnvFilter` directive.
    pub fn set_level(
        &self,
        level: &str,
    ) -> Result<()> {
        let filter = make_filter(Some(level))?;
        self.level
            .reload(filter)
            .map_err(|e| anyhow!("filter reload failed: {e}"))
    }

    /// Appends log records to `path`, replacing any file already open. The
    /// parent directory must exist.
    pub fn log_to_file(
        &self,
        path: &Path,
    ) -> Result<()> {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file '{}'", path.display()))?;
        *self.file.lock() = Some(file);
        Ok(())
    }

    pub fn stop_file_logging(&self) {
        *self.file.lock() = None;
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// `level` overrides `RUST_LOG`; `file` starts file logging immediately.
pub fn init_logging(
    level: Option<&str>,
    file: Option<&Path>,
) -> Result<LoggingHandle> {
    let (level_filter, level_handle) = reload::Layer::new(make_filter(level)?);
    let slot = FileSlot::default();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(false)
        .with_writer(slot.clone());

    tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    let handle = LoggingHandle {
        level: level_handle,
        file: slot,
    };
    if let Some(path) = file {
        handle.log_to_file(path)?;
    }
    Ok(handle)
}
