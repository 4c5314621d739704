//! # Comparator Module
//!
//! Duplicate groups and their optional exact verification.
//!
//! Fingerprints are truncated digests, so two different files can share one.
//! [`verify_groups`] re-reads every member of a group, computes the full MD5
//! digest and splits the group wherever the full digests disagree.
//!
//! | Step | Outcome |
//! |------|---------|
//! | all members share a full digest | group kept as is |
//! | members disagree | group split, subgroups of 1 dropped |
//! | member unreadable | member dropped with a warning |

use crate::core::hasher::{full_digest, Fingerprint};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Files sharing one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Shared fingerprint
    #[serde(rename = "hash")]
    pub fingerprint: Fingerprint,
    /// Member paths in arrival order
    #[serde(rename = "filePaths", serialize_with = "serialize_paths_lossy")]
    pub paths: Vec<PathBuf>,
}

/// Paths that are not valid UTF-8 get U+FFFD in place of the bad bytes.
fn serialize_paths_lossy<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

impl DuplicateGroup {
    pub fn new(fingerprint: Fingerprint, paths: Vec<PathBuf>) -> Self {
        Self { fingerprint, paths }
    }

    /// Get the number of duplicates (excluding one copy to keep)
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Outcome of [`verify_groups`]
#[derive(Debug, Clone, Default)]
pub struct VerifiedGroups {
    /// Groups whose members have identical full digests
    pub groups: Vec<DuplicateGroup>,
    /// Input groups that contained more than one distinct full digest
    pub aliased_groups: usize,
    /// Members dropped because they could no longer be read
    pub unreadable: Vec<PathBuf>,
}

/// Split every group by full MD5 digest.
///
/// Subgroups keep the original fingerprint and the original member order.
pub fn verify_groups(groups: &[DuplicateGroup]) -> VerifiedGroups {
    let mut verified = VerifiedGroups::default();

    for group in groups {
        let mut order: Vec<String> = Vec::new();
        let mut by_digest: HashMap<String, Vec<PathBuf>> = HashMap::new();

        for path in &group.paths {
            let digest = File::open(path).and_then(|file| full_digest(BufReader::new(file)));
            match digest {
                Ok(digest) => {
                    if !by_digest.contains_key(&digest) {
                        order.push(digest.clone());
                    }
                    by_digest.entry(digest).or_default().push(path.clone());
                }
                Err(e) => {
                    warn!("Failed to verify {}: {}", path.display(), e);
                    verified.unreadable.push(path.clone());
                }
            }
        }

        if order.len() > 1 {
            debug!(
                "Fingerprint {} aliases {} distinct contents",
                group.fingerprint,
                order.len()
            );
            verified.aliased_groups += 1;
        }

        for digest in order {
            let paths = by_digest.remove(&digest).unwrap_or_default();
            if paths.len() > 1 {
                verified
                    .groups
                    .push(DuplicateGroup::new(group.fingerprint.clone(), paths));
            }
        }
    }

    verified
}
