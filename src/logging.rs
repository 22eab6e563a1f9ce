use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

/// Privacy-preserving logger for shellspeak.
///
/// Request text and generated commands are never written to the log; only
/// pipeline events, configuration changes, and errors are recorded.
pub struct EventLogger {
    log_file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

/// Categories for the different parts of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogCategory {
    System,
    Configuration,
    Classification,
    Completion,
    Execution,
    Network,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
}

static LOGGER: OnceLock<Arc<Mutex<EventLogger>>> = OnceLock::new();

/// Initialize the global logger. Safe to call more than once.
pub fn init_logger() -> Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = EventLogger::new()?;
    let _ = LOGGER.set(Arc::new(Mutex::new(logger)));
    Ok(())
}

pub fn get_logger() -> Result<Arc<Mutex<EventLogger>>> {
    LOGGER
        .get()
        .cloned()
        .ok_or_else(|| anyhow!("Logger not initialized"))
}

/// Convenience helper: log an event through the global logger, ignoring
/// logger failures so logging can never break the pipeline.
pub fn log_event(level: LogLevel, category: LogCategory, message: &str) {
    if let Ok(logger) = get_logger() {
        if let Ok(logger_guard) = logger.lock() {
            let _ = logger_guard.log(level, category, message);
        }
    }
}

impl EventLogger {
    fn new() -> Result<Self> {
        let log_file_path = Self::default_log_path()
            .ok_or_else(|| anyhow!("Could not determine config directory for log file"))?;

        if let Some(parent) = log_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_file_path })
    }

    fn default_log_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("shellspeak");
            path.push("events.log");
            path
        })
    }

    pub fn log(&self, level: LogLevel, category: LogCategory, message: &str) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            category,
            message: message.to_string(),
        };
        self.write_entry(&entry)
    }

    pub fn log_info(&self, category: LogCategory, message: &str) -> Result<()> {
        self.log(LogLevel::Info, category, message)
    }

    pub fn log_startup(&self, version: &str, os_info: &str) -> Result<()> {
        self.log_info(
            LogCategory::System,
            &format!("shellspeak {} started on {}", version, os_info),
        )
    }

    pub fn log_config_change(&self, setting: &str, old: &str, new: &str) -> Result<()> {
        self.log_info(
            LogCategory::Configuration,
            &format!("Setting '{}' changed: {} -> {}", setting, old, new),
        )
    }

    pub fn get_log_path(&self) -> &PathBuf {
        &self.log_file_path
    }

    pub fn clear_logs(&self) -> Result<()> {
        if self.log_file_path.exists() {
            fs::write(&self.log_file_path, "")?;
        }
        self.log_info(LogCategory::System, "Log file cleared")
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let line = format!(
            "[{}] [{:?}] [{:?}] {}\n",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            entry.level,
            entry.category,
            entry.message
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
