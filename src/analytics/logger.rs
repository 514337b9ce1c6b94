use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the client event log (`~/.sheweldo/events.jsonl`).
///
/// One line per submission outcome or failed fetch. Read back by the
/// reporter for `sheweldo log`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub timestamp: String,
    /// Emitting component: `company_form`, `salary_form`, `reference`, `charts`.
    pub component: String,
    /// `success`, `invalid`, `rejected`, `network_error`, or `fetch_failed`.
    pub outcome: String,
    /// HTTP status, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    /// Message shown to the user or the underlying error.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

impl ClientEvent {
    pub fn new(component: &str, outcome: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            component: component.to_string(),
            outcome: outcome.to_string(),
            status: None,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL event log.
///
/// Writing is best-effort: a missing home directory or an unwritable file
/// never fails the operation being logged.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// Build from config; a disabled log discards every event.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: config.resolved_path(),
        }
    }

    /// A log that writes to `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Record an event.
    pub fn record(&self, event: &ClientEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &ClientEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every event. Malformed lines are skipped; a missing file reads
    /// as empty.
    pub fn read_all(&self) -> Vec<ClientEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ClientEvent>(&line).ok())
            .collect()
    }

    /// Read events from the last `days` days (all events when `None`).
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<ClientEvent> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();
        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
