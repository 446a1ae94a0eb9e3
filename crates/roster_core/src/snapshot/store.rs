use super::error::SnapshotError;
use super::format::{decode, encode, ModelSnapshot};

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_FILE: &str = "model_snapshot.dat";

/// Directory-backed snapshot persistence.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    pub fn save(&self, snapshot: &ModelSnapshot) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let data = encode(snapshot)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;

        log::info!(
            "Saved model snapshot ({} bytes, seasons {:?}) to {:?}",
            data.len(),
            snapshot.train_seasons,
            path
        );
        Ok(())
    }

    pub fn load(&self) -> Result<ModelSnapshot, SnapshotError> {
        let path = self.path();
        if !path.exists() {
            return Err(SnapshotError::NotFound {
                path: path.display().to_string(),
            });
        }

        let mut data = Vec::new();
        File::open(&path)?.read_to_end(&mut data)?;
        let snapshot = decode(&data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }
}
