//! Writes statistics as `{prefix} {name}={value}` lines to a globally configured writer.
//!
//! Nothing is written until [`configure_statistic_logging`] has been called, so a kernel embedded
//! in a larger program stays silent unless asked otherwise.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistics are written.
pub struct StatisticOptions {
    /// Printed in front of every statistic.
    prefix: &'static str,
    /// An optional line which closes a block of statistics.
    postfix: Option<&'static str>,
    /// The casing applied to statistic names, names are written as-is when absent.
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Enables statistic logging.
///
/// Only the first call has an effect. When no writer is given, statistics go to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

/// Logs a single statistic, if statistic logging is configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = options.lock() else {
        return;
    };

    let name = match options.casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    let prefix = options.prefix;
    let _ = writeln!(options.writer, "{prefix} {name}={value}");
}

/// Writes the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = options.lock() else {
        return;
    };

    if let Some(postfix) = options.postfix {
        let _ = writeln!(options.writer, "{postfix}");
    }
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
