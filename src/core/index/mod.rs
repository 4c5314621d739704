//! # Index Module
//!
//! The fingerprint → paths mapping built by the collector.
//!
//! Only the collector thread ever mutates a [`DuplicateIndex`]; workers hand
//! it immutable [`FileRecord`]s over a channel. Once the pipeline drains the
//! index is returned by value and is read-only from then on.

use crate::core::comparator::DuplicateGroup;
use crate::core::hasher::Fingerprint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A hashed file on its way from a worker to the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
}

impl FileRecord {
    pub fn new(fingerprint: Fingerprint, path: PathBuf) -> Self {
        Self { fingerprint, path }
    }
}

/// Paths grouped by fingerprint, in arrival order within each group.
#[derive(Debug, Clone, Default)]
pub struct DuplicateIndex {
    groups: HashMap<Fingerprint, Vec<PathBuf>>,
    total_paths: usize,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record's path to its fingerprint's group.
    pub fn insert(&mut self, record: FileRecord) {
        self.groups
            .entry(record.fingerprint)
            .or_default()
            .push(record.path);
        self.total_paths += 1;
    }

    /// Paths recorded under `fingerprint`
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[PathBuf]> {
        self.groups.get(fingerprint).map(Vec::as_slice)
    }

    /// Number of distinct fingerprints
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of paths across all groups
    pub fn total_paths(&self) -> usize {
        self.total_paths
    }

    /// Fingerprint of the group containing `path`, if it was recorded.
    pub fn fingerprint_of(&self, path: &Path) -> Option<&Fingerprint> {
        self.groups
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(fingerprint, _)| fingerprint)
    }

    /// Every group, singletons included, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[PathBuf])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Groups holding two or more paths, in unspecified order.
    pub fn duplicates(&self) -> impl Iterator<Item = (&Fingerprint, &[PathBuf])> {
        self.iter().filter(|(_, paths)| paths.len() > 1)
    }

    /// Duplicate groups sorted by fingerprint, ready for rendering.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .duplicates()
            .map(|(fingerprint, paths)| DuplicateGroup::new(fingerprint.clone(), paths.to_vec()))
            .collect();
        groups.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        groups
    }
}
