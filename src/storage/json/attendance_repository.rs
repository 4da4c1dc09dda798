//! JSON-backed implementation of the `AttendanceStorage` trait.
//!
//! The whole log lives in a single `attendance.json` document: a nested
//! date -> person id -> prayer -> bool mapping, sparse at every level.
//! Mutations follow the same read-modify-write-atomically pattern as the
//! person repository.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::attendance::AttendanceLog;
use crate::storage::traits::AttendanceStorage;

#[derive(Clone)]
pub struct AttendanceRepository {
    connection: Arc<JsonConnection>,
}

impl AttendanceRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    /// Read the stored log. Missing or unparseable data loads as an empty
    /// log rather than an error.
    fn read_log(&self) -> AttendanceLog {
        let path = self.connection.attendance_file_path();

        if !path.exists() {
            debug!("Attendance document does not exist yet, starting empty");
            return AttendanceLog::new();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(log) => log,
                Err(e) => {
                    warn!(
                        "Attendance document at {} is unreadable, starting empty: {}",
                        path.display(),
                        e
                    );
                    AttendanceLog::new()
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read attendance document at {}, starting empty: {}",
                    path.display(),
                    e
                );
                AttendanceLog::new()
            }
        }
    }

    /// Write the log back atomically (temp file, then rename).
    fn write_log(&self, log: &AttendanceLog) -> Result<()> {
        let path = self.connection.attendance_file_path();
        let json = serde_json::to_string_pretty(log)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json).with_context(|| {
            format!("Failed to write attendance document to {}", path.display())
        })?;
        fs::rename(&temp_path, &path)?;

        debug!(
            "Saved attendance for {} dates to {}",
            log.date_count(),
            path.display()
        );
        Ok(())
    }
}

impl AttendanceStorage for AttendanceRepository {
    fn load_log(&self) -> Result<AttendanceLog> {
        Ok(self.read_log())
    }

    fn set_mark(&self, date: &str, person_id: &str, prayer: &str, present: bool) -> Result<()> {
        let mut log = self.read_log();
        log.set_mark(date, person_id, prayer, present);
        self.write_log(&log)
    }

    fn remove_person_marks(&self, person_id: &str) -> Result<()> {
        let mut log = self.read_log();
        log.remove_person(person_id);
        self.write_log(&log)
    }

    fn replace_log(&self, log: &AttendanceLog) -> Result<()> {
        self.write_log(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (AttendanceRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (AttendanceRepository::new(connection), temp_dir)
    }

    #[test]
    fn set_mark_round_trips_through_disk() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.set_mark("2024-01-05", "p1", "Fajr", true).unwrap();
        repo.set_mark("2024-01-05", "p1", "Zuhr", false).unwrap();

        let log = repo.load_log().unwrap();
        assert!(log.is_present("2024-01-05", "p1", "Fajr"));
        assert!(!log.is_present("2024-01-05", "p1", "Zuhr"));
        assert!(!log.is_present("2024-01-05", "p1", "Asr"));
    }

    #[test]
    fn remove_person_marks_cascades_across_dates() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.set_mark("2024-01-05", "p1", "Fajr", true).unwrap();
        repo.set_mark("2024-01-06", "p1", "Isha", true).unwrap();
        repo.set_mark("2024-01-06", "p2", "Isha", true).unwrap();

        repo.remove_person_marks("p1").unwrap();

        let log = repo.load_log().unwrap();
        for date in ["2024-01-05", "2024-01-06"] {
            assert!(log.day(date).unwrap().get("p1").is_none());
        }
        assert!(log.is_present("2024-01-06", "p2", "Isha"));
    }

    #[test]
    fn missing_and_corrupt_documents_load_as_empty() {
        let (repo, temp_dir) = setup_test_repo();
        assert!(repo.load_log().unwrap().is_empty());

        fs::write(temp_dir.path().join("attendance.json"), "][").unwrap();
        assert!(repo.load_log().unwrap().is_empty());
    }
}
