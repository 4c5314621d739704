//! Pipeline execution implementation.

use crate::core::hasher::{FingerprintHasher, DEFAULT_FINGERPRINT_LEN, FULL_DIGEST_LEN};
use crate::core::index::DuplicateIndex;
use crate::core::scanner::{
    DirectoryWalker, SizeFilter, SkipSummary, WalkConfig, DEFAULT_MAX_FILE_SIZE,
};
use crate::error::DedupError;
use crate::events::{null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary};
use crossbeam_channel::bounded;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use super::collector::spawn_collector;
use super::workers::{spawn_workers, WorkerStats};

/// Concurrent hashing threads unless configured otherwise
pub const DEFAULT_WORKER_COUNT: usize = 16;

/// Records between progress notifications
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Progress interval used for verbose runs
pub const VERBOSE_PROGRESS_INTERVAL: usize = 100;

/// Path queue slots per worker when no explicit capacity is set
const QUEUE_SLOTS_PER_WORKER: usize = 4;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Fingerprint → paths for every hashed file
    pub index: DuplicateIndex,
    /// Files that were hashed and recorded
    pub files_processed: usize,
    /// Files that produced no record, by reason
    pub skipped: SkipSummary,
    /// Walk errors encountered (non-fatal)
    pub walk_errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Files above this many bytes are skipped
    pub max_file_size: u64,
    /// Number of concurrent file processors
    pub worker_count: usize,
    /// Records between progress notifications (0 disables them)
    pub progress_interval: usize,
    /// Path queue capacity (None = `worker_count * 4`)
    pub queue_capacity: Option<usize>,
    /// Hex characters kept from each digest
    pub fingerprint_len: usize,
    /// Walker configuration
    pub walk_config: WalkConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            queue_capacity: None,
            fingerprint_len: DEFAULT_FINGERPRINT_LEN,
            walk_config: WalkConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DedupError> {
        if !(1..=FULL_DIGEST_LEN).contains(&self.fingerprint_len) {
            return Err(DedupError::Config(format!(
                "fingerprint length must be between 1 and {}, got {}",
                FULL_DIGEST_LEN, self.fingerprint_len
            )));
        }
        if self.max_file_size == 0 {
            return Err(DedupError::Config(
                "max file size must be greater than zero".to_string(),
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(DedupError::Config(
                "queue capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn effective_workers(&self) -> usize {
        self.worker_count.max(1)
    }

    fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or_else(|| self.effective_workers() * QUEUE_SLOTS_PER_WORKER)
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the size ceiling in bytes (inclusive)
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// Set the number of hashing workers
    pub fn worker_count(mut self, workers: usize) -> Self {
        self.config.worker_count = workers;
        self
    }

    /// Set how many records pass between progress notifications
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Set the path queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// Set the number of hex characters kept per fingerprint
    pub fn fingerprint_len(mut self, len: usize) -> Self {
        self.config.fingerprint_len = len;
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.walk_config.follow_symlinks = follow;
        self
    }

    /// Set walker configuration
    pub fn walk_config(mut self, config: WalkConfig) -> Self {
        self.config.walk_config = config;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The walk → hash → collect pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, DedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Walk errors and unreadable files never fail the run; they are logged
    /// and reported in the result. Only a panicked worker or collector thread
    /// is returned as an error.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, DedupError> {
        self.config.validate()?;

        let start_time = Instant::now();
        let workers = self.config.effective_workers();
        let capacity = self.config.effective_queue_capacity();

        info!(
            "scanning {} workers={} max_file_size={} queue_capacity={}",
            self.config.root.display(),
            workers,
            self.config.max_file_size,
            capacity
        );

        events.send(Event::Pipeline(PipelineEvent::Started));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let (path_tx, path_rx) = bounded::<PathBuf>(capacity);
        let (outcome_tx, outcome_rx) = bounded(capacity * 2);

        let collector = spawn_collector(outcome_rx, self.config.progress_interval, events.clone());

        let worker_handles = spawn_workers(
            workers,
            path_rx,
            outcome_tx.clone(),
            SizeFilter::new(self.config.max_file_size),
            FingerprintHasher::new(self.config.fingerprint_len),
            events,
        );

        // Runs on this thread; closes the path queue when it returns.
        let walker = DirectoryWalker::new(self.config.walk_config.clone());
        let walk_summary = walker.walk(&self.config.root, path_tx, events);

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Draining,
        }));

        let mut totals = WorkerStats::default();
        let mut worker_panicked = false;
        for handle in worker_handles {
            match handle.join() {
                Ok(stats) => totals += stats,
                Err(_) => worker_panicked = true,
            }
        }
        debug!(
            "workers finished: hashed={} skipped={}",
            totals.files_hashed, totals.files_skipped
        );

        // Only now may the result channel close; earlier would drop in-flight records.
        drop(outcome_tx);

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Collecting,
        }));

        let output = collector
            .join()
            .map_err(|_| DedupError::Pipeline("collector thread panicked".to_string()))?;

        if worker_panicked {
            return Err(DedupError::Pipeline("a worker thread panicked".to_string()));
        }

        let walk_errors: Vec<String> = walk_summary.errors.iter().map(|e| e.to_string()).collect();
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let summary = PipelineSummary {
            files_processed: output.files_processed,
            files_skipped: output.skipped.total(),
            unique_fingerprints: output.index.len(),
            duplicate_groups: output.index.duplicates().count(),
            duration_ms,
        };
        info!(
            "scan finished: found={} processed={} skipped={} walk_errors={} groups={}",
            walk_summary.files_found,
            summary.files_processed,
            summary.files_skipped,
            walk_errors.len(),
            summary.duplicate_groups
        );
        events.send(Event::Pipeline(PipelineEvent::Completed { summary }));

        Ok(PipelineResult {
            index: output.index,
            files_processed: output.files_processed,
            skipped: output.skipped,
            walk_errors,
            duration_ms,
        })
    }
}
