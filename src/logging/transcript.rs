// JSONL transcript of successful exchanges

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::SamplingConfig;
use crate::orchestrator::RequestOutcome;

const DEFAULT_FLUSH_THRESHOLD: usize = 10;

/// A single transcript line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Unique ID for this entry
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Prompt as sent (marker stripped)
    pub prompt: String,

    /// Reply text, or the recovered object for structured requests
    pub response: Value,

    pub structured: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    pub model: String,

    pub tokens_used: Option<u32>,

    pub response_time_ms: f64,

    pub sampling: SamplingConfig,
}

impl TranscriptEntry {
    pub fn from_outcome(outcome: &RequestOutcome) -> Self {
        let response = serde_json::to_value(&outcome.data).unwrap_or(Value::Null);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            prompt: outcome.prompt.clone(),
            response,
            structured: outcome.structured(),
            schema_name: outcome.schema_name.map(str::to_string),
            model: outcome.sampling_used.model.clone(),
            tokens_used: outcome.tokens_used,
            response_time_ms: outcome.response_time_ms,
            sampling: outcome.sampling_used.clone(),
        }
    }
}

/// Buffered JSONL writer
pub struct TranscriptLogger {
    path: PathBuf,
    buffer: Vec<TranscriptEntry>,
    flush_threshold: usize,
}

impl TranscriptLogger {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create transcript directory {}", parent.display()))?;
            }
        }

        Ok(Self {
            path,
            buffer: Vec::new(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        })
    }

    /// Flush after this many buffered entries (minimum 1)
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold.max(1);
        self
    }

    /// Buffer one outcome, returning the entry ID
    pub fn record(&mut self, outcome: &RequestOutcome) -> Result<String> {
        let entry = TranscriptEntry::from_outcome(outcome);
        let id = entry.id.clone();
        self.buffer.push(entry);

        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }

        Ok(id)
    }

    /// Append buffered entries to the file
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        debug!("Flushing {} transcript entries to {}", self.buffer.len(), self.path.display());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open transcript {}", self.path.display()))?;

        for entry in &self.buffer {
            let json = serde_json::to_string(entry).context("Failed to serialize transcript entry")?;
            writeln!(file, "{}", json).context("Failed to write transcript entry")?;
        }

        self.buffer.clear();
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TranscriptLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!("Failed to flush transcript on drop: {}", e);
        }
    }
}
