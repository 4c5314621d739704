//! # Dupe Finder
//!
//! A concurrent duplicate file finder.
//!
//! ## How It Works
//! A directory walk feeds file paths into a bounded queue, a fixed pool of
//! worker threads fingerprints each file, and a single collector thread
//! groups the results by fingerprint. Groups with two or more files are the
//! duplicates.
//!
//! ## Architecture
//! - `core` - The scanning and grouping engine
//! - `events` - Channel-based progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the library
///
/// Honors `RUST_LOG`; otherwise logs at `default_level` to stderr.
/// Calling it more than once is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
