use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for a `-v` count.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn filter_for(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,mapty={level}")
}

/// Send logs to `path`. The terminal belongs to the TUI, so nothing goes to stderr.
///
/// Logging is best effort: if the file cannot be opened the app runs without it.
pub fn init_logging(path: &Path, verbose: u8) {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_writer(Mutex::new(file))
        .compact()
        .try_init();
}
