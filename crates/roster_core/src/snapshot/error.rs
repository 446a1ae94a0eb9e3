use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Snapshot not found: {path}")]
    NotFound { path: String },

    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

impl SnapshotError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SnapshotError::Io(_) => true,
            SnapshotError::NotFound { .. } => true, // retrain
            SnapshotError::VersionMismatch { .. } => true, // retrain
            SnapshotError::Corrupted => false,
            SnapshotError::ChecksumMismatch => false,
            _ => false,
        }
    }
}
