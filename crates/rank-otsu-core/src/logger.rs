//! Logging setup for binaries built on the workspace.
//!
//! Libraries only emit through the `log` facade. A binary picks one sink:
//! `init_with_level` installs a plain stderr writer
//! (`   0.123s INFO  rank_otsu_filters: ...`), while `init_tracing`
//! (feature `tracing`) installs a `tracing-subscriber` registry that also
//! records spans and can emit JSON.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{
    filter::LevelFilter as TraceLevel, fmt, fmt::format::FmtSpan, prelude::*, EnvFilter,
};

struct StderrLogger {
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Crate name only; module paths make lines too wide.
        let target = record.target().split("::").next().unwrap_or_default();
        let mut out = std::io::stderr().lock();
        let _ = writeln!(
            out,
            "{:>8.3}s {:<5} {}: {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            target,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// The logger is installed on the first call; later calls only change the
/// level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            started: Instant::now(),
        });
        log::set_logger(logger)?;
    }
    log::set_max_level(level);
    Ok(())
}

#[cfg(feature = "tracing")]
fn trace_level(level: LevelFilter) -> TraceLevel {
    match level {
        LevelFilter::Off => TraceLevel::OFF,
        LevelFilter::Error => TraceLevel::ERROR,
        LevelFilter::Warn => TraceLevel::WARN,
        LevelFilter::Info => TraceLevel::INFO,
        LevelFilter::Debug => TraceLevel::DEBUG,
        LevelFilter::Trace => TraceLevel::TRACE,
    }
}

/// `RUST_LOG` when set, otherwise everything at or above `level`.
#[cfg(feature = "tracing")]
pub fn tracing_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(trace_level(level).into())
        .from_env_lossy()
}

/// Install a `tracing-subscriber` registry filtered by [`tracing_filter`].
///
/// `json = true` writes one flattened JSON object per event, otherwise
/// human-readable lines with uptime stamps. Closed spans report their
/// busy/idle time. `log` records are bridged into the same output.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_timer(fmt::time::Uptime::default())
            .with_span_events(FmtSpan::CLOSE)
    });
    let _ = tracing_subscriber::registry()
        .with(tracing_filter(level))
        .with(json_layer)
        .with(text_layer)
        .try_init();
}
