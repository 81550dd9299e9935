//! Background record reader

use std::path::{Path, PathBuf};

use flume::Sender;
use log::debug;

use super::IngestError;
use crate::claim::ClaimRecord;

/// A finished read of one record submission
#[derive(Debug)]
pub(crate) struct RecordOutcome {
    pub generation: u64,
    pub name: String,
    pub result: Result<ClaimRecord, IngestError>,
}

pub(crate) fn spawn_record_reader(
    generation: u64,
    name: String,
    path: PathBuf,
    results: Sender<RecordOutcome>,
) {
    std::thread::spawn(move || {
        let result = read_record(&path);
        debug!(
            "Record read #{generation} of {} finished (ok: {})",
            path.display(),
            result.is_ok()
        );
        // The receiver is gone when the ingestion screen was left
        let _ = results.send(RecordOutcome {
            generation,
            name,
            result,
        });
    });
}

/// Read and parse a claim record file
pub fn read_record(path: &Path) -> Result<ClaimRecord, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| IngestError::InvalidRecord(e.into()))?;
    Ok(ClaimRecord::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_valid_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"claim_id": "C-1"}}"#).unwrap();
        let record = read_record(file.path()).unwrap();
        assert_eq!(record.claim_id, "C-1");
    }

    #[test]
    fn rejects_malformed_and_non_object_json() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{ not json").unwrap();
        assert!(matches!(
            read_record(broken.path()),
            Err(IngestError::InvalidRecord(_))
        ));

        let mut scalar = tempfile::NamedTempFile::new().unwrap();
        write!(scalar, "42").unwrap();
        assert!(matches!(
            read_record(scalar.path()),
            Err(IngestError::InvalidRecord(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_record(&dir.path().join("absent.json")),
            Err(IngestError::Io { .. })
        ));
    }
}
