//! # Error Module
//!
//! Error types for the duplicate file finder.
//!
//! ## Design Principles
//! - **Never abort on a single bad entry** - walk and file errors are recorded, not returned
//! - **Include context** - paths and the underlying I/O failure
//! - **One fatal boundary** - only writing the report can fail a healthy run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Report generation error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pipeline failure: {0}")]
    Pipeline(String),
}

/// Errors that occur while walking a directory tree.
///
/// These are recorded per entry and never stop the walk.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory entry {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while rendering the duplicate report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create report file {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize report entry: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
