//! # Pipeline Module
//!
//! Orchestrates the concurrent duplicate scan.
//!
//! ## Pipeline Stages
//! 1. **Walk** - the calling thread enumerates regular files into a bounded path queue
//! 2. **Hash** - a fixed pool of worker threads fingerprints each file
//! 3. **Collect** - one collector thread folds results into the index
//!
//! ## Concurrency
//! The path queue and the result channel are the only state shared between
//! threads. Workers never touch the index; the collector is its sole writer,
//! so the map needs no lock. The result channel closes only after every
//! worker has been joined.

mod collector;
mod executor;
mod workers;

pub use collector::{spawn_collector, Collector, CollectorOutput};
pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, DEFAULT_PROGRESS_INTERVAL,
    DEFAULT_WORKER_COUNT, VERBOSE_PROGRESS_INTERVAL,
};
pub use workers::{spawn_workers, WorkerStats};

use crate::core::index::DuplicateIndex;
use crate::error::Result;
use std::path::Path;

/// Scan `root` with default settings and return the finished index.
pub fn find_duplicates(root: &Path) -> Result<DuplicateIndex> {
    Ok(Pipeline::builder().root(root).build().run()?.index)
}
