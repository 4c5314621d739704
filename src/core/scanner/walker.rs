//! Directory walking implementation using walkdir.

use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory walker
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Whether to follow symbolic links (no cycle detection is done)
    pub follow_symlinks: bool,
}

/// What a walk found
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Regular files sent to the path queue
    pub files_found: usize,
    /// Directories entered
    pub directories_scanned: usize,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Feeds regular-file paths under a root into the path queue
pub struct DirectoryWalker {
    config: WalkConfig,
}

impl DirectoryWalker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Walk `root`, sending every regular file to `queue`.
    ///
    /// Consumes the sender, so the queue is closed exactly once when the walk
    /// returns. Entry errors are logged and recorded; they never stop the walk.
    pub fn walk(&self, root: &Path, queue: Sender<PathBuf>, events: &EventSender) -> WalkSummary {
        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut summary = WalkSummary::default();

        let walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        summary.directories_scanned += 1;
                        continue;
                    }
                    if !file_type.is_file() {
                        debug!("Ignoring non-regular entry {}", entry.path().display());
                        continue;
                    }

                    if queue.send(entry.into_path()).is_err() {
                        warn!("Path queue closed early; stopping walk");
                        break;
                    }
                    summary.files_found += 1;
                }
                Err(e) => {
                    let error = classify_walk_error(e);
                    warn!("{}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: error_path(&error),
                        message: error.to_string(),
                    }));
                    summary.errors.push(error);
                }
            }
        }

        drop(queue);

        events.send(Event::Scan(ScanEvent::Completed {
            files_found: summary.files_found,
            directories_scanned: summary.directories_scanned,
        }));

        summary
    }
}

fn classify_walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
    let kind = e.io_error().map(|io| io.kind());

    match kind {
        Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied { path },
        Some(std::io::ErrorKind::NotFound) if e.depth() == 0 => {
            ScanError::DirectoryNotFound { path }
        }
        _ => {
            let message = e.to_string();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message));
            ScanError::ReadDirectory { path, source }
        }
    }
}

fn error_path(error: &ScanError) -> PathBuf {
    match error {
        ScanError::DirectoryNotFound { path }
        | ScanError::PermissionDenied { path }
        | ScanError::ReadDirectory { path, .. } => path.clone(),
    }
}
