//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `hasher` - Content fingerprints (truncated MD5)
//! - `scanner` - Directory walk, size policy, per-file processing
//! - `index` - The fingerprint → paths mapping
//! - `pipeline` - Worker pool, collector and orchestration
//! - `comparator` - Duplicate groups and full-digest verification
//! - `reporter` - JSON and text rendering

pub mod comparator;
pub mod hasher;
pub mod index;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::DuplicateGroup;
pub use hasher::{Fingerprint, FingerprintHasher};
pub use index::{DuplicateIndex, FileRecord};
pub use pipeline::{Pipeline, PipelineResult};
pub use scanner::{SkipReason, SkippedFile};
