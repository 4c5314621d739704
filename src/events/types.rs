//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate finder pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory walk events
    Scan(ScanEvent),
    /// Per-file hashing events
    Hash(HashEvent),
    /// Collector events
    Collect(CollectEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the directory walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking has started
    Started { root: PathBuf },
    /// An entry could not be read but walking continues
    Error { path: PathBuf, message: String },
    /// Walking completed and the path queue was closed
    Completed {
        files_found: usize,
        directories_scanned: usize,
    },
}

/// Events from the worker pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// A file was excluded or could not be read
    Skipped { path: PathBuf, reason: String },
}

/// Events from the collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CollectEvent {
    /// Periodic progress notification
    Progress(CollectProgress),
    /// The result channel closed and every record was folded into the index
    Completed { files_processed: usize },
}

/// Progress information from the collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectProgress {
    /// Records folded into the index so far
    pub files_processed: usize,
    /// Distinct fingerprints seen so far
    pub unique_fingerprints: usize,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    /// Walker is feeding the queue while workers hash
    Scanning,
    /// Walk finished; waiting for workers to drain the queue
    Draining,
    /// Waiting for the collector to finish
    Collecting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Files that were hashed and recorded
    pub files_processed: usize,
    /// Files excluded by size policy or read errors
    pub files_skipped: usize,
    /// Distinct fingerprints in the index
    pub unique_fingerprints: usize,
    /// Fingerprints shared by two or more files
    pub duplicate_groups: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Draining => write!(f, "Draining"),
            PipelinePhase::Collecting => write!(f, "Collecting"),
        }
    }
}
