//! File ingestion for the upload screen.
//!
//! Files arrive one at a time or in batches (a drag-and-drop paste), in any
//! order. Documents are read into memory right away; records are read and
//! parsed on a background thread and picked up by [`Ingestion::poll`].

mod classify;
mod paths;
mod reader;

use std::io;
use std::path::{Path, PathBuf};

use flume::{Receiver, Sender};
use log::{debug, info, warn};

use crate::claim::{ClaimRecord, RecordError};
use crate::document::DocumentSource;

pub use classify::{FileKind, classify, classify_mime, classify_path};
pub use paths::{paths_from_input, percent_decode, split_pasted_paths};
pub use reader::read_record;
use reader::{RecordOutcome, spawn_record_reader};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Please upload a PDF or JSON file.")]
    Unrecognized { path: PathBuf },

    #[error("Could not read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid JSON file. Please check the format.")]
    InvalidRecord(#[from] RecordError),
}

/// A parsed record waiting for the review to start
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub name: String,
    pub record: ClaimRecord,
}

/// Everything the upload screen has collected so far
pub struct Ingestion {
    document: Option<DocumentSource>,
    record: Option<PendingRecord>,
    /// Name of the record file being read, if any
    reading: Option<String>,
    error: Option<IngestError>,
    /// Bumped on every record submission and removal; older reads are ignored
    generation: u64,
    results_tx: Sender<RecordOutcome>,
    results_rx: Receiver<RecordOutcome>,
}

impl Default for Ingestion {
    fn default() -> Self {
        Self::new()
    }
}

impl Ingestion {
    pub fn new() -> Self {
        let (results_tx, results_rx) = flume::unbounded();
        Self {
            document: None,
            record: None,
            reading: None,
            error: None,
            generation: 0,
            results_tx,
            results_rx,
        }
    }

    pub fn handle_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.handle_path(path.as_ref());
        }
    }

    pub fn handle_path(&mut self, path: &Path) {
        self.handle_file(path, None);
    }

    /// Take one file. Clears the current error; the outcome may set a new one.
    pub fn handle_file(&mut self, path: &Path, mime: Option<&str>) {
        self.error = None;
        match classify(path, mime) {
            FileKind::Document => self.register_document(path),
            FileKind::Record => self.submit_record(path),
            FileKind::Unrecognized => {
                info!("Ignoring unrecognized file {}", path.display());
                self.error = Some(IngestError::Unrecognized {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    fn register_document(&mut self, path: &Path) {
        match DocumentSource::open(path) {
            Ok(source) => {
                info!("Registered document {}", source.name());
                // Replacing drops (and releases) the previous document
                self.document = Some(source);
            }
            Err(source) => {
                warn!("Failed to read document {}: {source}", path.display());
                self.error = Some(IngestError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    fn submit_record(&mut self, path: &Path) {
        self.generation += 1;
        let name = display_name(path);
        debug!("Reading record {name} (#{})", self.generation);
        self.reading = Some(name.clone());
        spawn_record_reader(
            self.generation,
            name,
            path.to_path_buf(),
            self.results_tx.clone(),
        );
    }

    /// Pick up finished record reads. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.results_rx.try_recv() {
            changed |= self.apply_outcome(outcome);
        }
        changed
    }

    fn apply_outcome(&mut self, outcome: RecordOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Ignoring superseded record read #{} of {}",
                outcome.generation, outcome.name
            );
            return false;
        }
        self.reading = None;
        match outcome.result {
            Ok(record) => {
                info!("Registered record {}", outcome.name);
                self.record = Some(PendingRecord {
                    name: outcome.name,
                    record,
                });
            }
            Err(err) => {
                match &err {
                    IngestError::InvalidRecord(detail) => {
                        warn!("Rejected record {}: {detail}", outcome.name)
                    }
                    other => warn!("Rejected record {}: {other}", outcome.name),
                }
                // The previously registered record stays
                self.error = Some(err);
            }
        }
        true
    }

    pub fn document(&self) -> Option<&DocumentSource> {
        self.document.as_ref()
    }

    pub fn record(&self) -> Option<&PendingRecord> {
        self.record.as_ref()
    }

    /// Name of the record file still being read
    pub fn reading_record(&self) -> Option<&str> {
        self.reading.as_deref()
    }

    pub fn error(&self) -> Option<&IngestError> {
        self.error.as_ref()
    }

    pub fn can_proceed(&self) -> bool {
        self.document.is_some() && self.record.is_some()
    }

    /// Drop the pending document. Returns false if there was none.
    pub fn remove_document(&mut self) -> bool {
        match self.document.take() {
            Some(source) => {
                info!("Removed document {}", source.name());
                true
            }
            None => false,
        }
    }

    /// Drop the pending record and any read still in flight
    pub fn remove_record(&mut self) -> bool {
        self.generation += 1;
        self.reading = None;
        match self.record.take() {
            Some(pending) => {
                info!("Removed record {}", pending.name);
                true
            }
            None => false,
        }
    }

    /// Hand over both inputs when the review can start
    pub fn confirm(&mut self) -> Option<(DocumentSource, PendingRecord)> {
        if !self.can_proceed() {
            return None;
        }
        let document = self.document.take()?;
        let record = self.record.take()?;
        self.error = None;
        Some((document, record))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
