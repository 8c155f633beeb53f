use std::sync::Mutex;
use std::sync::mpsc::Sender;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Where formatted `[LEVEL] message` lines end up.
pub enum LogSink {
    /// Forwarded to the TUI console pane.
    Channel(Mutex<Sender<String>>),
    Stderr,
}

pub struct ConsoleLogger {
    sink: LogSink,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn channel(tx: Sender<String>, level: LevelFilter) -> Self {
        Self {
            sink: LogSink::Channel(Mutex::new(tx)),
            level,
        }
    }

    pub fn stderr(level: LevelFilter) -> Self {
        Self {
            sink: LogSink::Stderr,
            level,
        }
    }

    /// Installs this logger as the global `log` backend. A second install is ignored.
    pub fn install(self) {
        let level = self.level;
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(level);
        }
    }
}

pub fn format_line(level: Level, msg: &str) -> String {
    let tag = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("[{tag}] {msg}")
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), &record.args().to_string());
        match &self.sink {
            LogSink::Channel(tx) => {
                if let Ok(tx) = tx.lock() {
                    let _ = tx.send(line);
                }
            }
            LogSink::Stderr => eprintln!("{line}"),
        }
    }

    fn flush(&self) {}
}
