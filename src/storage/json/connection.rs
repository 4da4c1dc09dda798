use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// JsonConnection manages the base data directory and the paths of the two
/// persisted JSON documents.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory,
    /// `~/Documents/Masjid Attendance` (home directory as fallback).
    pub fn new_default() -> Result<Self> {
        let parent = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;
        Self::new(parent.join("Masjid Attendance"))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the people document (JSON array of Person).
    pub fn people_file_path(&self) -> PathBuf {
        self.base_directory.join("people.json")
    }

    /// Path of the attendance document (date -> person -> prayer -> bool).
    pub fn attendance_file_path(&self) -> PathBuf {
        self.base_directory.join("attendance.json")
    }
}
