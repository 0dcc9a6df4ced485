//! Library state persistence with file locking.
//!
//! The library state holds everything the user authors (spaces and their
//! circuits) plus achievement unlock state, which must survive restarts so
//! unlock timestamps stay sticky. Saves are atomic: write to a temp file,
//! sync, rename over the original.

use crate::achievements::{build_default_achievements, Achievement};
use crate::types::TrainingSpace;
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// User-authored content and achievement state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryState {
    pub spaces: Vec<TrainingSpace>,
    pub achievements: Vec<Achievement>,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self {
            spaces: Vec::new(),
            achievements: build_default_achievements(),
        }
    }
}

impl LibraryState {
    pub fn space_by_name(&self, name: &str) -> Option<&TrainingSpace> {
        self.spaces.iter().find(|s| s.name == name)
    }

    pub fn space_by_name_mut(&mut self, name: &str) -> Option<&mut TrainingSpace> {
        self.spaces.iter_mut().find(|s| s.name == name)
    }

    /// Circuits authored across all spaces
    pub fn total_circuits(&self) -> usize {
        self.spaces.iter().map(|s| s.circuits.len()).sum()
    }

    /// Load library state from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist. A corrupted file
    /// logs a warning and returns default state rather than failing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<LibraryState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded library state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save library state to a file with exclusive locking
    ///
    /// Atomically writes state by writing to a temp file, syncing to disk,
    /// and renaming over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved library state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut LibraryState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }
}
