//! # Hasher Module
//!
//! Computes content fingerprints for files.
//!
//! A fingerprint is the MD5 digest of the full file content rendered as
//! lowercase hex and truncated to a short prefix (8 characters by default).
//! Truncation makes fingerprints cheap to store and compare, at the cost of
//! occasional aliasing between different files. Groups that must be exact
//! can be re-checked with [`full_digest`] (see `core::comparator`).
//!
//! ## Example
//! ```rust,ignore
//! use dupe_finder::core::hasher::FingerprintHasher;
//!
//! let hasher = FingerprintHasher::default();
//! let fingerprint = hasher.hash_bytes(b"hello");
//! assert_eq!(fingerprint.as_str(), "5d41402a");
//! ```

use serde::{Deserialize, Serialize};
use std::io::{self, Read};

/// Hex characters in a full MD5 digest.
pub const FULL_DIGEST_LEN: usize = 32;

/// Hex characters kept in a fingerprint unless configured otherwise.
pub const DEFAULT_FINGERPRINT_LEN: usize = 8;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Truncated content digest used as the grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed hex string.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces fingerprints of a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintHasher {
    len: usize,
}

impl FingerprintHasher {
    /// Create a hasher keeping `len` hex characters of the digest.
    ///
    /// `len` is clamped to `1..=32`.
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(1, FULL_DIGEST_LEN),
        }
    }

    /// Number of hex characters in produced fingerprints
    pub fn digest_len(&self) -> usize {
        self.len
    }

    /// Fingerprint an in-memory buffer
    pub fn hash_bytes(&self, bytes: &[u8]) -> Fingerprint {
        let hex = format!("{:x}", md5::compute(bytes));
        self.truncate(hex)
    }

    /// Fingerprint everything `reader` yields, streaming through a fixed buffer.
    pub fn hash_reader<R: Read>(&self, reader: R) -> io::Result<Fingerprint> {
        Ok(self.truncate(digest_reader(reader)?))
    }

    fn truncate(&self, mut hex: String) -> Fingerprint {
        hex.truncate(self.len);
        Fingerprint(hex)
    }
}

impl Default for FingerprintHasher {
    fn default() -> Self {
        Self::new(DEFAULT_FINGERPRINT_LEN)
    }
}

/// Full 32-character MD5 hex digest of everything `reader` yields.
pub fn full_digest<R: Read>(reader: R) -> io::Result<String> {
    digest_reader(reader)
}

fn digest_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        context.consume(&buffer[..read]);
    }
    Ok(format!("{:x}", context.compute()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn default_fingerprint_is_md5_prefix() {
        let hasher = FingerprintHasher::default();
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(hasher.hash_bytes(b"hello").as_str(), "5d41402a");
    }

    #[test]
    fn reader_and_bytes_agree() {
        let hasher = FingerprintHasher::default();
        let data = vec![7u8; READ_BUFFER_SIZE * 3 + 17];
        let streamed = hasher.hash_reader(Cursor::new(&data)).unwrap();
        assert_eq!(streamed, hasher.hash_bytes(&data));
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let hasher = FingerprintHasher::default();
        assert_ne!(hasher.hash_bytes(b"ab"), hasher.hash_bytes(b"ba"));
    }

    #[test]
    fn length_is_clamped() {
        assert_eq!(FingerprintHasher::new(0).digest_len(), 1);
        assert_eq!(FingerprintHasher::new(64).digest_len(), FULL_DIGEST_LEN);
        let full = FingerprintHasher::new(FULL_DIGEST_LEN).hash_bytes(b"hello");
        assert_eq!(full.as_str(), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn full_digest_of_empty_input() {
        let digest = full_digest(Cursor::new(Vec::<u8>::new())).unwrap();
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn fingerprint_serializes_as_plain_string() {
        let json = serde_json::to_string(&Fingerprint::new("5d41402a")).unwrap();
        assert_eq!(json, "\"5d41402a\"");
    }
}
