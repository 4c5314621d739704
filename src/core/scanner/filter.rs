//! Size policy applied before a file is hashed.

use super::SkipReason;

/// Files above this many bytes are skipped unless configured otherwise (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Decides from a file's size whether it gets hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFilter {
    max_file_size: u64,
}

impl SizeFilter {
    /// Create a filter with an inclusive ceiling of `max_file_size` bytes
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// `Ok` if a file of `size` bytes should be hashed
    pub fn check(&self, size: u64) -> Result<(), SkipReason> {
        if size == 0 {
            return Err(SkipReason::Empty);
        }
        if size > self.max_file_size {
            return Err(SkipReason::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}
