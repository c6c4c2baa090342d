// SPDX-License-Identifier: MIT
//
// A minimal `log` backend writing to stderr.
//
// Rendered output goes to stdout, so log lines never interleave with it.
// The level comes from `--log-level`, else `$Y_PRISM_LOG`, else off.

use std::env;
use std::io::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the default log level.
pub const LOG_ENV: &str = "Y_PRISM_LOG";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A closed stderr is not worth failing a render over.
        let _ = writeln!(
            io::stderr().lock(),
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Calling it twice keeps the first logger but
/// still updates the level.
pub fn init(cli_level: Option<LevelFilter>) {
    let level = resolve_level(cli_level, env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}

/// The command-line level wins; an unparsable environment value is ignored.
fn resolve_level(cli_level: Option<LevelFilter>, env_value: Option<&str>) -> LevelFilter {
    cli_level
        .or_else(|| env_value.and_then(|v| v.trim().parse().ok()))
        .unwrap_or(LevelFilter::Off)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_precedence() {
        assert_eq!(resolve_level(None, None), LevelFilter::Off);
        assert_eq!(resolve_level(None, Some("debug")), LevelFilter::Debug);
        assert_eq!(resolve_level(None, Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(resolve_level(None, Some("loud")), LevelFilter::Off);
        assert_eq!(
            resolve_level(Some(LevelFilter::Trace), Some("error")),
            LevelFilter::Trace
        );
    }
}
