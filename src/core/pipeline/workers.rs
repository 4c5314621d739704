//! Worker thread spawning for the hashing pool.

use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::core::hasher::FingerprintHasher;
use crate::core::scanner::{process_file, FileOutcome, SizeFilter};
use crate::events::{Event, EventSender, HashEvent};

/// Per-worker counters returned through the join handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub files_hashed: usize,
    pub files_skipped: usize,
}

impl WorkerStats {
    pub fn files_handled(&self) -> usize {
        self.files_hashed + self.files_skipped
    }
}

impl std::ops::AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.files_hashed += other.files_hashed;
        self.files_skipped += other.files_skipped;
    }
}

/// Spawn `workers` hashing threads (at least one).
///
/// Each thread pulls paths from `path_rx` until the queue is closed and
/// drained, and forwards exactly one outcome per path to `outcome_tx`.
pub fn spawn_workers(
    workers: usize,
    path_rx: Receiver<PathBuf>,
    outcome_tx: Sender<FileOutcome>,
    filter: SizeFilter,
    hasher: FingerprintHasher,
    events: &EventSender,
) -> Vec<thread::JoinHandle<WorkerStats>> {
    let worker_count = workers.max(1);
    let mut handles = Vec::with_capacity(worker_count);

    for worker_id in 0..worker_count {
        let path_rx = path_rx.clone();
        let outcome_tx = outcome_tx.clone();
        let events = events.clone();

        handles.push(thread::spawn(move || {
            let mut stats = WorkerStats::default();

            for path in path_rx {
                let outcome = process_file(path, &filter, &hasher);
                match &outcome {
                    FileOutcome::Hashed(_) => stats.files_hashed += 1,
                    FileOutcome::Skipped(skipped) => {
                        stats.files_skipped += 1;
                        events.send(Event::Hash(HashEvent::Skipped {
                            path: skipped.path.clone(),
                            reason: skipped.reason.to_string(),
                        }));
                    }
                }

                if outcome_tx.send(outcome).is_err() {
                    warn!("worker {worker_id}: result channel closed, stopping");
                    break;
                }
            }

            debug!(
                "worker {worker_id} finished: hashed={} skipped={}",
                stats.files_hashed, stats.files_skipped
            );
            stats
        }));
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use crossbeam_channel::{bounded, unbounded};
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn every_path_is_processed_exactly_once() {
        let dir = TempDir::new().unwrap();
        let (path_tx, path_rx) = bounded(4);
        let (outcome_tx, outcome_rx) = unbounded();

        let handles = spawn_workers(
            8,
            path_rx,
            outcome_tx,
            SizeFilter::default(),
            FingerprintHasher::default(),
            &null_sender(),
        );

        let mut expected = HashSet::new();
        for i in 0..100 {
            let path = dir.path().join(format!("{i}.txt"));
            fs::write(&path, format!("content {}", i % 10)).unwrap();
            expected.insert(path.clone());
            path_tx.send(path).unwrap();
        }
        drop(path_tx);

        let total: WorkerStats = handles.into_iter().fold(WorkerStats::default(), |mut acc, h| {
            acc += h.join().unwrap();
            acc
        });

        let seen: Vec<PathBuf> = outcome_rx
            .iter()
            .map(|outcome| match outcome {
                FileOutcome::Hashed(record) => record.path,
                FileOutcome::Skipped(skipped) => skipped.path,
            })
            .collect();

        assert_eq!(seen.len(), 100);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), expected);
        assert_eq!(total.files_hashed, 100);
        assert_eq!(total.files_handled(), 100);
    }

    #[test]
    fn zero_workers_still_spawns_one() {
        let (path_tx, path_rx) = bounded::<PathBuf>(1);
        let (outcome_tx, _outcome_rx) = unbounded();

        let handles = spawn_workers(
            0,
            path_rx,
            outcome_tx,
            SizeFilter::default(),
            FingerprintHasher::default(),
            &null_sender(),
        );
        assert_eq!(handles.len(), 1);
        drop(path_tx);
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn skipped_files_are_forwarded() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").unwrap();

        let (path_tx, path_rx) = bounded(1);
        let (outcome_tx, outcome_rx) = unbounded();
        let handles = spawn_workers(
            2,
            path_rx,
            outcome_tx,
            SizeFilter::default(),
            FingerprintHasher::default(),
            &null_sender(),
        );

        path_tx.send(empty).unwrap();
        drop(path_tx);
        for handle in handles {
            assert_eq!(handle.join().unwrap().files_hashed, 0);
        }

        let outcomes: Vec<_> = outcome_rx.iter().collect();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], FileOutcome::Skipped(_)));
    }
}
