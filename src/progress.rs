use crate::error::TfResult;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::warn;

/// One global-best improvement, in the shape the dashboard reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub best_score: u32,
    pub seed: u64,
    pub elapsed_time: f64,
    pub step: u64,
    pub steps_per_sec: f64,
}

impl ProgressEntry {
    pub fn new(best_score: u32, seed: u64, elapsed: Duration, step: u64) -> Self {
        let secs = elapsed.as_secs_f64();
        let steps_per_sec = if secs > 0.0 { step as f64 / secs } else { 0.0 };
        Self {
            best_score,
            seed,
            elapsed_time: secs,
            step,
            steps_per_sec,
        }
    }
}

/// Receives global-best improvements. Must never fail the caller.
///
/// Chains call this after releasing the global lock, so two close
/// improvements can arrive in either order.
pub trait ProgressSink: Send + Sync {
    fn record(&self, entry: &ProgressEntry);
}

pub struct NullFeed;

impl ProgressSink for NullFeed {
    fn record(&self, _entry: &ProgressEntry) {}
}

/// Keeps the feed file as a JSON array, rewritten on every append.
/// Entries that do not raise the best score are dropped.
pub struct JsonLogFeed {
    path: PathBuf,
    entries: Mutex<Vec<ProgressEntry>>,
}

impl JsonLogFeed {
    pub fn create<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let feed = Self {
            path,
            entries: Mutex::new(Vec::new()),
        };
        feed.flush(&[])?;
        Ok(feed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Vec<ProgressEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn flush(&self, entries: &[ProgressEntry]) -> TfResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        Ok(())
    }
}

impl ProgressSink for JsonLogFeed {
    fn record(&self, entry: &ProgressEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(entries.last(), Some(last) if last.best_score >= entry.best_score) {
            return;
        }
        entries.push(entry.clone());
        if let Err(e) = self.flush(&entries) {
            warn!("⚠️  Could not write progress feed '{}': {}", self.path.display(), e);
        }
    }
}
