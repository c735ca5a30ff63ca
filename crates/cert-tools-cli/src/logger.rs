use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};

/// Writes log records to stderr, one timestamped line each
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(verbose: bool) -> Self {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

fn format_entry(timestamp: &DateTime<Local>, level: Level, target: &str, message: &str) -> String {
    format!(
        "{} {level:<5} [{target}] {message}",
        timestamp.format("%H:%M:%S")
    )
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}",
                format_entry(
                    &Local::now(),
                    record.level(),
                    record.target(),
                    &record.args().to_string()
                )
            );
        }
    }

    fn flush(&self) {}
}
