//! Best-effort run bookkeeping: generation summary and workflow log.
//!
//! These writes must never abort a batch. Failures are logged and reported
//! as `None`; callers that care can surface the missing path to the user.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use courseforge_shared::{RunLogEntry, RunSummary};

/// File name of the per-run summary document.
const SUMMARY_FILE_NAME: &str = "generation_summary.json";

/// File name of the per-run workflow log.
const LOG_FILE_NAME: &str = "workflow_log.md";

/// Write the run summary as one pretty-printed JSON document.
///
/// Best-effort: returns `None` (after logging) on any failure.
pub fn save_generation_summary(output_dir: &Path, summary: &RunSummary) -> Option<PathBuf> {
    info!("saving generation summary");
    let summary_path = output_dir.join(SUMMARY_FILE_NAME);

    let json = match serde_json::to_string_pretty(summary) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize generation summary");
            return None;
        }
    };

    match std::fs::write(&summary_path, json) {
        Ok(()) => {
            info!(path = %summary_path.display(), "generation summary saved");
            Some(summary_path)
        }
        Err(e) => {
            error!(path = %summary_path.display(), error = %e, "failed to save generation summary");
            None
        }
    }
}

/// Render the workflow log entries as a markdown table and write it.
///
/// Entries are rendered in the order given. Best-effort: returns `None`
/// (after logging) on any failure.
pub fn save_workflow_log(output_dir: &Path, entries: &[RunLogEntry]) -> Option<PathBuf> {
    info!(entries = entries.len(), "saving workflow log");
    let log_path = output_dir.join(LOG_FILE_NAME);

    let mut log_content = String::from("# Workflow Log\n\n");
    log_content.push_str("| Timestamp | Step | Status | Message |\n");
    log_content.push_str("|-----------|------|--------|--------|\n");

    for entry in entries {
        log_content.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            entry.timestamp, entry.step, entry.status, entry.message
        ));
    }

    match std::fs::write(&log_path, log_content) {
        Ok(()) => {
            info!(path = %log_path.display(), "workflow log saved");
            Some(log_path)
        }
        Err(e) => {
            error!(path = %log_path.display(), error = %e, "failed to save workflow log");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cf-bookkeeping-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn summary_written_as_json() {
        let tmp = temp_dir();
        let mut summary = RunSummary::new();
        summary.insert("status".into(), "completed".into());
        summary.insert("success_count".into(), 3.into());

        let path = save_generation_summary(&tmp, &summary).unwrap();
        assert_eq!(path.file_name().unwrap(), "generation_summary.json");

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["status"], "completed");
        assert_eq!(parsed["success_count"], 3);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn summary_failure_returns_none() {
        let missing = std::env::temp_dir().join("cf-no-such-dir").join("nested");
        let summary = RunSummary::new();
        assert!(save_generation_summary(&missing, &summary).is_none());
    }

    #[test]
    fn workflow_log_rendered_as_table_in_order() {
        let tmp = temp_dir();
        let entries = vec![
            RunLogEntry {
                timestamp: "2026-08-07 10:00:00".into(),
                step: "Module M1, Lesson L1, Step 1".into(),
                status: "started".into(),
                message: "Generating content".into(),
            },
            RunLogEntry {
                timestamp: "2026-08-07 10:00:05".into(),
                step: "Module M1, Lesson L1, Step 1".into(),
                status: "completed".into(),
                message: "Saved artifact".into(),
            },
        ];

        let path = save_workflow_log(&tmp, &entries).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.starts_with("# Workflow Log\n\n"));
        assert!(written.contains("| Timestamp | Step | Status | Message |"));
        let started = written.find("started").unwrap();
        let completed = written.find("completed").unwrap();
        assert!(started < completed);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn workflow_log_failure_returns_none() {
        let missing = std::env::temp_dir().join("cf-no-such-dir").join("nested");
        assert!(save_workflow_log(&missing, &[]).is_none());
    }
}
