//! Single-file processing: open, size check, fingerprint.

use super::{FileOutcome, SizeFilter, SkipReason, SkippedFile};
use crate::core::hasher::FingerprintHasher;
use crate::core::index::FileRecord;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Fingerprint the file at `path`, or explain why it was skipped.
///
/// Never fails: open, stat and read errors become [`FileOutcome::Skipped`].
/// The file handle is dropped before returning on every path.
pub fn process_file(path: PathBuf, filter: &SizeFilter, hasher: &FingerprintHasher) -> FileOutcome {
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => return skip(path, SkipReason::Open(e.to_string())),
    };

    let metadata = match file.metadata() {
        Ok(metadata) => metadata,
        Err(e) => return skip(path, SkipReason::Metadata(e.to_string())),
    };

    if !metadata.is_file() {
        return skip(path, SkipReason::NotRegular);
    }

    if let Err(reason) = filter.check(metadata.len()) {
        return skip(path, reason);
    }

    match hasher.hash_reader(file) {
        Ok(fingerprint) => FileOutcome::Hashed(FileRecord::new(fingerprint, path)),
        Err(e) => skip(path, SkipReason::Read(e.to_string())),
    }
}

fn skip(path: PathBuf, reason: SkipReason) -> FileOutcome {
    if reason.is_error() {
        warn!("Skipping {}: {}", path.display(), reason);
    } else {
        debug!("Skipping {}: {}", path.display(), reason);
    }
    FileOutcome::Skipped(SkippedFile { path, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::SkipKind;
    use std::fs;
    use tempfile::TempDir;

    fn outcome_for(dir: &TempDir, name: &str, content: &[u8], limit: u64) -> FileOutcome {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        process_file(path, &SizeFilter::new(limit), &FingerprintHasher::default())
    }

    fn skip_kind(outcome: FileOutcome) -> SkipKind {
        match outcome {
            FileOutcome::Skipped(s) => s.reason.kind(),
            FileOutcome::Hashed(r) => panic!("expected skip, got {:?}", r),
        }
    }

    #[test]
    fn hashes_regular_file() {
        let dir = TempDir::new().unwrap();
        match outcome_for(&dir, "a.txt", b"hello", 1024) {
            FileOutcome::Hashed(record) => {
                assert_eq!(record.fingerprint.as_str(), "5d41402a");
                assert!(record.path.ends_with("a.txt"));
            }
            FileOutcome::Skipped(s) => panic!("unexpected skip: {}", s.reason),
        }
    }

    #[test]
    fn skips_empty_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(skip_kind(outcome_for(&dir, "empty", b"", 1024)), SkipKind::Empty);
    }

    #[test]
    fn ceiling_is_inclusive() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            outcome_for(&dir, "at", &[1u8; 16], 16),
            FileOutcome::Hashed(_)
        ));
        assert_eq!(
            skip_kind(outcome_for(&dir, "over", &[1u8; 17], 16)),
            SkipKind::TooLarge
        );
    }

    #[test]
    fn missing_file_is_an_open_skip() {
        let dir = TempDir::new().unwrap();
        let outcome = process_file(
            dir.path().join("missing"),
            &SizeFilter::default(),
            &FingerprintHasher::default(),
        );
        assert_eq!(skip_kind(outcome), SkipKind::Open);
    }

    #[cfg(unix)]
    #[test]
    fn directory_is_not_regular() {
        let dir = TempDir::new().unwrap();
        let outcome = process_file(
            dir.path().to_path_buf(),
            &SizeFilter::default(),
            &FingerprintHasher::default(),
        );
        assert_eq!(skip_kind(outcome), SkipKind::NotRegular);
    }
}
