//! Diagnostics on stderr, driven by the `LDIG_LOG` environment variable.
//!
//! The resolver and driver log through the `log` facade; this module plugs a
//! minimal stderr backend behind it. Logging defaults to warnings only.

use std::env;
use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the wanted level.
pub const LOG_ENV: &str = "LDIG_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "ldig: {}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`),
/// ignoring case.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

/// The level asked for in the environment, or `Warn`.
pub fn level_from_env() -> LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Warn)
}

/// Install the stderr logger. Calling it twice keeps the first logger.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_from_env());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" trace "), Some(LevelFilter::Trace));
        assert_eq!(parse_level("chatty"), None);
        assert_eq!(parse_level(""), None);
    }

    #[test]
    fn env_level() {
        let saved = env::var(LOG_ENV).ok();

        env::set_var(LOG_ENV, "info");
        assert_eq!(level_from_env(), LevelFilter::Info);

        env::set_var(LOG_ENV, "nonsense");
        assert_eq!(level_from_env(), LevelFilter::Warn);

        env::remove_var(LOG_ENV);
        assert_eq!(level_from_env(), LevelFilter::Warn);

        if let Some(v) = saved {
            env::set_var(LOG_ENV, v);
        }
    }
}
