//! CSV rollup for archiving logged sessions.
//!
//! The JSONL log grows with every session; rolling it into the CSV archive
//! keeps the hot file small while preserving the summary fields the
//! analytics aggregator needs. The conversion is atomic so a crash cannot
//! lose sessions.

use crate::{Result, TrainingSession};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    circuit_id: String,
    circuit_name: String,
    space_id: String,
    space_name: String,
    started_at: String,
    ended_at: Option<String>,
    completed_rounds: u32,
    total_rounds: u32,
    rating: Option<u8>,
    notes: Option<String>,
}

impl From<&TrainingSession> for CsvRow {
    fn from(session: &TrainingSession) -> Self {
        CsvRow {
            id: session.id.to_string(),
            circuit_id: session.circuit_id.to_string(),
            circuit_name: session.circuit_name.clone(),
            space_id: session.space_id.to_string(),
            space_name: session.space_name.clone(),
            started_at: session.started_at.to_rfc3339(),
            ended_at: session.ended_at.map(|t| t.to_rfc3339()),
            completed_rounds: session.completed_rounds,
            total_rounds: session.total_rounds,
            rating: session.rating,
            notes: session.notes.clone(),
        }
    }
}

/// Roll logged sessions into the CSV archive and retire the log atomically.
///
/// Reads every session from the JSONL log, appends them to the CSV (writing
/// headers only for a fresh file), fsyncs, then renames the log to
/// `.processed`. The rename happens strictly after the sync, so the log is
/// only retired once its contents are durable. Returns the number of
/// sessions archived.
pub fn log_to_csv_and_archive(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let sessions = crate::history::read_sessions(log_path)?;

    if sessions.is_empty() {
        tracing::info!("No sessions in log to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for session in &sessions {
        writer.serialize(CsvRow::from(session))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} sessions to CSV archive", sessions.len());

    let processed_path = log_path.with_extension("log.processed");
    std::fs::rename(log_path, &processed_path)?;

    tracing::info!("Archived session log to {:?}", processed_path);

    Ok(sessions.len())
}

/// Remove retired `.log.processed` files from the given directory.
pub fn cleanup_processed_logs(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_processed = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".log.processed"));

        if is_processed {
            std::fs::remove_file(&path)?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Removed {} processed log files", count);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{JsonlSink, SessionSink};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn test_session() -> TrainingSession {
        let start = Utc::now() - Duration::hours(1);
        let mut session =
            TrainingSession::new(Uuid::new_v4(), "Loop", Uuid::new_v4(), "Garage", start, 2);
        session.ended_at = Some(start + Duration::seconds(900));
        session.completed_rounds = 2;
        session
    }

    #[test]
    fn test_rollup_moves_sessions_to_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("sessions.log");
        let csv_path = temp_dir.path().join("sessions.csv");

        let mut sink = JsonlSink::new(&log_path);
        for _ in 0..3 {
            sink.append(&test_session()).unwrap();
        }

        let count = log_to_csv_and_archive(&log_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        assert!(!log_path.exists(), "log should be retired");
        assert!(log_path.with_extension("log.processed").exists());

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("id,circuit_id,circuit_name"));
        assert_eq!(contents.lines().count(), 4); // header + 3 rows
    }

    #[test]
    fn test_rollup_appends_without_duplicate_headers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("sessions.log");
        let csv_path = temp_dir.path().join("sessions.csv");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_session()).unwrap();
        log_to_csv_and_archive(&log_path, &csv_path).unwrap();

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_session()).unwrap();
        log_to_csv_and_archive(&log_path, &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let header_count = contents
            .lines()
            .filter(|l| l.starts_with("id,circuit_id"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_rollup_empty_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("sessions.log");
        let csv_path = temp_dir.path().join("sessions.csv");

        let count = log_to_csv_and_archive(&log_path, &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(!csv_path.exists());
    }

    #[test]
    fn test_cleanup_processed_logs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("sessions.log");
        let csv_path = temp_dir.path().join("sessions.csv");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_session()).unwrap();
        log_to_csv_and_archive(&log_path, &csv_path).unwrap();

        let removed = cleanup_processed_logs(temp_dir.path()).unwrap();
        assert_eq!(removed, 1);
        assert!(!log_path.with_extension("log.processed").exists());
    }
}
