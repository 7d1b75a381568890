//! File-backed `log` sink.
//!
//! The terminal is owned by the renderer, so log records go to the file named
//! by `NTETRIS_LOG_PATH`. Without it nothing is installed and the `log`
//! macros stay no-ops.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

pub const LOG_PATH_ENV: &str = "NTETRIS_LOG_PATH";
pub const LOG_LEVEL_ENV: &str = "NTETRIS_LOG_LEVEL";

struct FileLogger {
    level: LevelFilter,
    out: Mutex<LineWriter<File>>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(
                out,
                "{} {:<5} {}: {}",
                millis,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}

/// Parse a level name; unknown names fall back to `info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the file logger if `NTETRIS_LOG_PATH` is set.
///
/// Returns whether a logger was installed.
pub fn init_from_env() -> Result<bool> {
    let Ok(path) = env::var(LOG_PATH_ENV) else {
        return Ok(false);
    };
    let level = env::var(LOG_LEVEL_ENV)
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path))?;
    let logger = FileLogger {
        level,
        out: Mutex::new(LineWriter::new(file)),
    };
    log::set_boxed_logger(Box::new(logger)).context("installing logger")?;
    log::set_max_level(level);
    Ok(true)
}
