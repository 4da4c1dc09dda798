//! Test utilities for storage-backed tests.
//!
//! Provides an RAII environment whose temporary data directory is removed
//! when the environment drops, even if the test panics.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::JsonConnection;

/// RAII test environment wrapping a temporary data directory.
pub struct TestEnvironment {
    /// Kept alive to prevent cleanup until drop.
    _temp_dir: TempDir,
    pub connection: Arc<JsonConnection>,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = Arc::new(JsonConnection::new(&base_path)?);

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}
