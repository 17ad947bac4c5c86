#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSONL run logging shared across fertisim components.

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Log severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Component emitting the event.
    pub component: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary JSON payload for run fields.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, Value>,
}

impl LogEvent {
    /// Creates an event with the provided info.
    #[must_use]
    pub fn new(component: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            component: component.into(),
            level,
            message: message.into(),
            fields: serde_json::Map::new(),
        }
    }
}

/// Thread-safe JSONL run log with append-only semantics.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    writer: Mutex<File>,
}

impl RunLog {
    /// Creates or opens a run log at the desired path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    /// Appends an event as one JSON line.
    pub fn append(&self, event: &LogEvent) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Returns the underlying file path (useful for tests).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Builder for [`Telemetry`].
pub struct TelemetryBuilder {
    component: String,
    log_path: Option<PathBuf>,
}

impl TelemetryBuilder {
    /// Creates a new builder scoped to a component label.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            log_path: None,
        }
    }

    /// Sets the run log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<Telemetry> {
        Telemetry::new(self.component, self.log_path)
    }
}

/// Telemetry handle shared across fertisim components.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    component: String,
    log: Option<RunLog>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("component", &self.inner.component)
            .finish()
    }
}

impl Telemetry {
    fn new(component: impl Into<String>, log_path: Option<PathBuf>) -> Result<Self> {
        let log = if let Some(path) = log_path {
            Some(RunLog::new(path)?)
        } else {
            None
        };
        Ok(Self {
            inner: Arc::new(TelemetryInner {
                component: component.into(),
                log,
            }),
        })
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder(component: impl Into<String>) -> TelemetryBuilder {
        TelemetryBuilder::new(component)
    }

    /// Logs a message with a JSON payload.
    pub fn log(&self, level: LogLevel, message: &str, payload: Value) -> Result<()> {
        if let Some(log) = &self.inner.log {
            let mut event = LogEvent::new(&self.inner.component, level, message);
            if let Some(obj) = payload.as_object() {
                event.fields = obj.clone();
            }
            log.append(&event)?;
        }
        Ok(())
    }

    /// Logs an informational message.
    pub fn info(&self, message: &str, payload: Value) -> Result<()> {
        self.log(LogLevel::Info, message, payload)
    }

    /// Logs a warning.
    pub fn warn(&self, message: &str, payload: Value) -> Result<()> {
        self.log(LogLevel::Warn, message, payload)
    }
}
