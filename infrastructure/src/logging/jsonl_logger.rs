//! JSONL file writer for agent decisions.
//!
//! Each [`DecisionRecord`] is serialized as a single JSON line
//! (`agent_id`, `type`, `timestamp`, `reasoning`, `confidence`, `context`)
//! and appended to the file via a buffered writer.

use sentinel_application::ports::decision_logger::{DecisionLogger, DecisionRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only decision log, one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlDecisionLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDecisionLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Existing entries are kept; new ones are appended. Returns `None` if
    /// the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create decision log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open decision log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionLogger for JsonlDecisionLogger {
    fn log(&self, record: DecisionRecord) {
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize decision from {}: {}", record.agent_id, e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line) {
                warn!("Could not write decision log {}: {}", self.path.display(), e);
                return;
            }
            // Flush per record: the log is read by other processes
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDecisionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let logger = JsonlDecisionLogger::new(&path).unwrap();

        logger.log(
            DecisionRecord::new("gh-main", "github_triage_scan")
                .with_reasoning("Review queue is stalled")
                .with_confidence(0.8)
                .with_context(serde_json::json!({"impact_score": 7.0})),
        );
        logger.log(DecisionRecord::new("orchestrator", "orchestration").with_confidence(1.0));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["agent_id"], "gh-main");
        assert_eq!(lines[0]["type"], "github_triage_scan");
        assert_eq!(lines[0]["confidence"], 0.8);
        assert_eq!(lines[0]["context"]["impact_score"], 7.0);
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "orchestration");
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("decisions.jsonl");

        for agent in ["a", "b"] {
            let logger = JsonlDecisionLogger::new(&path).unwrap();
            logger.log(DecisionRecord::new(agent, "generic_scan"));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["agent_id"], "b");
    }

    #[test]
    fn test_records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let record = DecisionRecord::new("sec", "security_scan").with_confidence(0.95);
        {
            let logger = JsonlDecisionLogger::new(&path).unwrap();
            logger.log(record.clone());
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: DecisionRecord = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed, record);
    }
}
