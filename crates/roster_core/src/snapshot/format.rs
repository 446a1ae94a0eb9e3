use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::scoring::LinearScorer;
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

const CHECKSUM_LEN: usize = 32;

/// Trained model state, replaced wholesale on retrain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Training time (unix milliseconds)
    pub trained_at_ms: u64,

    /// Seasons the models were fitted on
    pub train_seasons: Vec<u16>,

    /// Score regressor, if one was trained
    #[serde(default)]
    pub scorer: Option<LinearScorer>,

    /// Unsold efficiency cut-off
    #[serde(default)]
    pub efficiency_threshold: Option<f64>,
}

impl Default for ModelSnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ModelSnapshot {
    pub fn new(train_seasons: Vec<u16>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            trained_at_ms: current_timestamp(),
            train_seasons,
            scorer: None,
            efficiency_threshold: None,
        }
    }

    pub fn with_scorer(mut self, scorer: LinearScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.efficiency_threshold = Some(threshold);
        self
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(scorer) = &self.scorer {
            scorer
                .validate()
                .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
        }
        if let Some(t) = self.efficiency_threshold {
            if !t.is_finite() {
                return Err(SnapshotError::Invalid(format!(
                    "efficiency threshold {} is not finite",
                    t
                )));
            }
        }
        Ok(())
    }

    /// RFC 3339 training time for display.
    pub fn format_trained_at(&self) -> String {
        use time::format_description::well_known::Rfc3339;

        OffsetDateTime::from_unix_timestamp_nanos(self.trained_at_ms as i128 * 1_000_000)
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// MessagePack → LZ4 → SHA-256 trailer
pub fn encode(snapshot: &ModelSnapshot) -> Result<Vec<u8>, SnapshotError> {
    snapshot.validate()?;

    let msgpack = to_vec_named(snapshot)?;
    let mut out = compress_prepend_size(&msgpack);

    let checksum = Sha256::digest(&out);
    out.extend_from_slice(&checksum);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<ModelSnapshot, SnapshotError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SnapshotError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;
    let snapshot: ModelSnapshot = from_slice(&msgpack)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelSnapshot {
        let scorer = LinearScorer::new(vec!["runs".into()], vec![0.5], 1.0).unwrap();
        ModelSnapshot::new(vec![2023, 2024])
            .with_scorer(scorer)
            .with_threshold(0.42)
    }

    #[test]
    fn test_encode_decode() {
        let snapshot = sample();
        let bytes = encode(&snapshot).unwrap();
        assert_eq!(decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = encode(&sample()).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(1);
        }
        assert!(matches!(decode(&bytes), Err(SnapshotError::ChecksumMismatch)));

        let mut bytes = encode(&sample()).unwrap();
        bytes[5] ^= 0xff;
        assert!(matches!(decode(&bytes), Err(SnapshotError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_is_corrupted() {
        assert!(matches!(decode(&[0u8; 10]), Err(SnapshotError::Corrupted)));
    }

    #[test]
    fn test_version_mismatch() {
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = encode(&snapshot).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::VersionMismatch { found, expected })
                if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
        ));
    }

    #[test]
    fn test_invalid_threshold_refused() {
        let snapshot = ModelSnapshot::new(vec![]).with_threshold(f64::NAN);
        assert!(matches!(encode(&snapshot), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_format_trained_at() {
        let mut snapshot = ModelSnapshot::new(vec![]);
        snapshot.trained_at_ms = 0;
        assert_eq!(snapshot.format_trained_at(), "1970-01-01T00:00:00Z");
    }
}
