//! The process-wide sink to which statistics are written. Nothing is written until the sink has
//! been configured, which only the binary does.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistics are written: every statistic becomes one line
/// `{prefix} {name}={value}`, with the name converted to the configured casing.
pub struct StatisticOptions {
    prefix: String,
    casing: Case,
    writer: Box<dyn Write + Send>,
}

impl StatisticOptions {
    /// Writes to stdout with `snake_case` names.
    pub fn new(prefix: impl Into<String>) -> Self {
        StatisticOptions {
            prefix: prefix.into(),
            casing: Case::Snake,
            writer: Box::new(stdout()),
        }
    }

    pub fn with_casing(self, casing: Case) -> Self {
        StatisticOptions { casing, ..self }
    }

    pub fn with_writer(self, writer: Box<dyn Write + Send>) -> Self {
        StatisticOptions { writer, ..self }
    }

    fn line(&self, name: impl Display, value: impl Display) -> String {
        format!(
            "{} {}={value}",
            self.prefix,
            name.to_string().to_case(self.casing)
        )
    }

    fn write(&mut self, name: impl Display, value: impl Display) {
        let line = self.line(name, value);
        let _ = writeln!(self.writer, "{line}");
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Enables the logging of statistics. Only the first call has an effect; returns `false` if the
/// logging had already been configured.
pub fn configure_statistic_logging(options: StatisticOptions) -> bool {
    let mut configured = false;
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        configured = true;
        Mutex::new(options)
    });
    configured
}

/// Writes the statistic `name` with `value`, if statistic logging has been configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = options.lock() {
            options.write(name, value);
        }
    }
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
