//! # Scanner Module
//!
//! Discovers files under a root and turns each one into a fingerprint record.
//!
//! ## Pieces
//! - [`DirectoryWalker`] - enumerates regular files and feeds the path queue
//! - [`SizeFilter`] - the size policy (empty and oversized files are skipped)
//! - [`process_file`] - opens, filters and fingerprints a single file
//!
//! Every file the walker finds ends up either as a [`FileRecord`] or as a
//! [`SkippedFile`] carrying a categorized [`SkipReason`].
//!
//! ## Example
//! ```rust,ignore
//! use dupe_finder::core::scanner::{process_file, SizeFilter};
//! use dupe_finder::core::hasher::FingerprintHasher;
//!
//! let outcome = process_file(path, &SizeFilter::new(1024 * 1024), &FingerprintHasher::default());
//! ```
//!
//! [`FileRecord`]: crate::core::index::FileRecord

mod filter;
mod processor;
mod walker;

pub use filter::{SizeFilter, DEFAULT_MAX_FILE_SIZE};
pub use processor::process_file;
pub use walker::{DirectoryWalker, WalkConfig, WalkSummary};

use crate::core::index::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// What happened to one file handed to [`process_file`]
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// The file was fingerprinted
    Hashed(FileRecord),
    /// The file was excluded or could not be read
    Skipped(SkippedFile),
}

/// A file that produced no record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Why a file produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Zero bytes long
    Empty,
    /// Larger than the configured ceiling
    TooLarge { size: u64, limit: u64 },
    /// Not a regular file by the time it was opened
    NotRegular,
    /// Could not be opened
    Open(String),
    /// Could not be stat'ed after opening
    Metadata(String),
    /// Failed while reading content
    Read(String),
}

/// Category of a [`SkipReason`], used for tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipKind {
    Empty,
    TooLarge,
    NotRegular,
    Open,
    Metadata,
    Read,
}

impl SkipReason {
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::Empty => SkipKind::Empty,
            SkipReason::TooLarge { .. } => SkipKind::TooLarge,
            SkipReason::NotRegular => SkipKind::NotRegular,
            SkipReason::Open(_) => SkipKind::Open,
            SkipReason::Metadata(_) => SkipKind::Metadata,
            SkipReason::Read(_) => SkipKind::Read,
        }
    }

    /// Policy exclusions are deliberate; everything else is an I/O failure.
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            SkipReason::Empty | SkipReason::TooLarge { .. } | SkipReason::NotRegular
        )
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty file"),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "file is {} bytes, limit is {} bytes", size, limit)
            }
            SkipReason::NotRegular => write!(f, "not a regular file"),
            SkipReason::Open(e) => write!(f, "failed to open: {}", e),
            SkipReason::Metadata(e) => write!(f, "failed to stat: {}", e),
            SkipReason::Read(e) => write!(f, "failed to read: {}", e),
        }
    }
}

/// Skipped files tallied by category
#[derive(Debug, Clone, Default)]
pub struct SkipSummary {
    counts: HashMap<SkipKind, usize>,
    files: Vec<SkippedFile>,
}

impl SkipSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, skipped: SkippedFile) {
        *self.counts.entry(skipped.reason.kind()).or_insert(0) += 1;
        self.files.push(skipped);
    }

    /// Number of files skipped for `kind`
    pub fn count(&self, kind: SkipKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Skips caused by I/O failures rather than size policy
    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|s| s.reason.is_error()).count()
    }

    pub fn files(&self) -> &[SkippedFile] {
        &self.files
    }
}
