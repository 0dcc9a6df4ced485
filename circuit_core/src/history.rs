//! Session history persistence.
//!
//! Finished sessions are appended to a JSONL write-ahead log with file
//! locking, then periodically rolled into a CSV archive (see `csv_rollup`).
//! Reading merges both sources, dropping duplicates by session id, and
//! returns history in chronological order - the order the analytics
//! aggregator consumes it in.

use crate::{Result, TrainingSession};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use fs2::FileExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Session sink trait for persisting finished sessions
pub trait SessionSink {
    fn append(&mut self, session: &TrainingSession) -> Result<()>;
}

/// JSONL-based session sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionSink for JsonlSink {
    fn append(&mut self, session: &TrainingSession) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended session {} to history log", session.id);
        Ok(())
    }
}

/// Read all sessions from a JSONL history log.
///
/// Corrupt lines are skipped with a warning rather than failing the read.
pub fn read_sessions(path: &Path) -> Result<Vec<TrainingSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sessions = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<TrainingSession>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sessions from history log", sessions.len());
    Ok(sessions)
}

/// CSV row format for reading archived sessions
#[derive(Debug, Deserialize)]
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

impl TryFrom<CsvRow> for TrainingSession {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let parse_uuid = |s: &str| {
            Uuid::parse_str(s).map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))
        };

        let started_at = DateTime::parse_from_rfc3339(&row.started_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let ended_at = row
            .ended_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let mut session = TrainingSession::new(
            parse_uuid(&row.circuit_id)?,
            row.circuit_name,
            parse_uuid(&row.space_id)?,
            row.space_name,
            started_at,
            row.total_rounds,
        );
        session.id = parse_uuid(&row.id)?;
        session.ended_at = ended_at;
        session.completed_rounds = row.completed_rounds;
        // Per-station and per-transition maps are not archived in CSV.
        session.rating = row.rating;
        session.notes = row.notes.filter(|n| !n.is_empty());
        Ok(session)
    }
}

/// Load the full session history from the log and the CSV archive.
///
/// Duplicates (a session present in both) are kept from the log only.
/// Returns sessions sorted by start date, oldest first.
pub fn load_history(log_path: &Path, csv_path: &Path) -> Result<Vec<TrainingSession>> {
    let mut sessions = Vec::new();
    let mut seen_ids = HashSet::new();

    if log_path.exists() {
        for session in read_sessions(log_path)? {
            seen_ids.insert(session.id);
            sessions.push(session);
        }
    }

    if csv_path.exists() {
        let mut archived = 0;
        for session in load_sessions_from_csv(csv_path)? {
            if seen_ids.insert(session.id) {
                sessions.push(session);
                archived += 1;
            }
        }
        tracing::debug!("Loaded {} sessions from CSV archive", archived);
    }

    sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));

    tracing::info!("Loaded {} total sessions", sessions.len());
    Ok(sessions)
}

fn load_sessions_from_csv(path: &Path) -> Result<Vec<TrainingSession>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut sessions = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match TrainingSession::try_from(row) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(sessions)
}
