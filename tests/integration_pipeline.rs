//! Integration tests for the pipeline module.
//!
//! These tests verify end-to-end pipeline behavior including:
//! - Grouping of identical content
//! - Size policy at the ceiling
//! - Completeness and partition of the index
//! - Stability across runs and worker counts
//! - Walk error tolerance

use assert_fs::prelude::*;
use dupe_finder::core::comparator::verify_groups;
use dupe_finder::core::pipeline::{find_duplicates, Pipeline, PipelineResult};
use dupe_finder::core::reporter::write_json_report;
use dupe_finder::core::scanner::SkipKind;
use dupe_finder::core::DuplicateIndex;
use predicates::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

fn run(root: &Path, workers: usize) -> PipelineResult {
    Pipeline::builder()
        .root(root)
        .worker_count(workers)
        .build()
        .run()
        .unwrap()
}

/// Every group as a set of paths, order-independent.
fn membership(index: &DuplicateIndex) -> BTreeSet<BTreeSet<PathBuf>> {
    index
        .iter()
        .map(|(_, paths)| paths.iter().cloned().collect())
        .collect()
}

fn all_files(root: &Path) -> HashSet<PathBuf> {
    let mut files = HashSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let file_type = entry.file_type().unwrap();
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                files.insert(entry.path());
            }
        }
    }
    files
}

/// A tree with duplicates spread across nested directories.
fn mixed_tree() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    for i in 0..60 {
        temp.child(format!("d{}/sub{}/file{}.txt", i % 3, i % 5, i))
            .write_str(&format!("payload {}", i % 7))
            .unwrap();
    }
    temp.child("empty.bin").touch().unwrap();
    temp.child("unique.txt").write_str("only one of me").unwrap();
    temp
}

#[test]
fn identical_files_share_one_group() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("A").write_str("hello").unwrap();
    temp.child("B").write_str("hello").unwrap();
    temp.child("C").write_str("world").unwrap();
    temp.child("D").touch().unwrap();

    let result = run(temp.path(), 4);
    let groups = result.index.duplicate_groups();

    assert_eq!(groups.len(), 1);
    let members: HashSet<_> = groups[0].paths.iter().cloned().collect();
    assert_eq!(
        members,
        HashSet::from([temp.child("A").path().to_path_buf(), temp.child("B").path().to_path_buf()])
    );

    assert!(result.index.fingerprint_of(temp.child("D").path()).is_none());
    assert_eq!(result.skipped.count(SkipKind::Empty), 1);
    assert_eq!(result.files_processed, 3);
}

#[test]
fn file_at_ceiling_is_included_and_one_over_is_not() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("at_limit").write_binary(&[b'x'; 64]).unwrap();
    temp.child("at_limit_copy").write_binary(&[b'x'; 64]).unwrap();
    temp.child("over_limit").write_binary(&[b'x'; 65]).unwrap();
    temp.child("over_limit_copy").write_binary(&[b'x'; 65]).unwrap();

    let result = Pipeline::builder()
        .root(temp.path())
        .max_file_size(64)
        .build()
        .run()
        .unwrap();

    let groups = result.index.duplicate_groups();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].paths.iter().all(|p| p
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("at_limit")));
    assert_eq!(result.skipped.count(SkipKind::TooLarge), 2);
}

#[test]
fn every_file_is_either_grouped_or_skipped() {
    let temp = mixed_tree();
    let result = run(temp.path(), 8);

    let mut accounted: HashSet<PathBuf> = result
        .index
        .iter()
        .flat_map(|(_, paths)| paths.iter().cloned())
        .collect();
    accounted.extend(result.skipped.files().iter().map(|s| s.path.clone()));

    assert_eq!(accounted, all_files(temp.path()));
    assert_eq!(
        result.index.total_paths() + result.skipped.total(),
        all_files(temp.path()).len()
    );
}

#[test]
fn no_path_appears_in_two_groups() {
    let temp = mixed_tree();
    let result = run(temp.path(), 8);

    let mut seen = HashSet::new();
    for (_, paths) in result.index.iter() {
        for path in paths {
            assert!(seen.insert(path.clone()), "{} grouped twice", path.display());
        }
    }
    // 7 distinct payloads over 60 files
    assert_eq!(result.index.duplicates().count(), 7);
}

#[test]
fn repeated_runs_yield_the_same_membership() {
    let temp = mixed_tree();
    let first = run(temp.path(), 16);
    let second = run(temp.path(), 16);

    assert_eq!(membership(&first.index), membership(&second.index));
}

#[test]
fn worker_count_does_not_change_membership() {
    let temp = mixed_tree();
    let single = run(temp.path(), 1);
    let many = run(temp.path(), 16);

    assert_eq!(membership(&single.index), membership(&many.index));
    assert_eq!(single.files_processed, many.files_processed);
}

#[test]
fn tiny_queue_still_processes_everything() {
    let temp = mixed_tree();
    let result = Pipeline::builder()
        .root(temp.path())
        .worker_count(3)
        .queue_capacity(1)
        .progress_interval(5)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.files_processed, 61);
}

#[cfg(unix)]
#[test]
fn unreadable_directory_does_not_hide_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("locked/secret.txt").write_str("hidden").unwrap();
    temp.child("open/a.txt").write_str("same").unwrap();
    temp.child("b.txt").write_str("same").unwrap();

    let locked = temp.child("locked").path().to_path_buf();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through mode 0o000; nothing to exercise then.
    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = Pipeline::builder().root(temp.path()).build().run();

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let result = result.unwrap();
    let groups = result.index.duplicate_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths.len(), 2);
    assert_eq!(result.files_processed, 2);

    assert_eq!(result.walk_errors.len(), 1);
    assert!(
        result.walk_errors[0].contains("Permission denied"),
        "unexpected walk error: {}",
        result.walk_errors[0]
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_still_yields_a_valid_report() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = assert_fs::TempDir::new().unwrap();
    let data = temp.child("data");
    data.create_dir_all().unwrap();
    std::fs::write(data.path().join(OsStr::from_bytes(b"bad\xffname")), "hello").unwrap();
    data.child("good").write_str("hello").unwrap();

    let result = run(data.path(), 2);
    let groups = result.index.duplicate_groups();
    assert_eq!(groups.len(), 1);

    let report = temp.child("duplicateFiles.json");
    write_json_report(&groups, report.path()).unwrap();

    let written = std::fs::read_to_string(report.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    let paths = parsed[0]["filePaths"].as_array().unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths
        .iter()
        .any(|p| p.as_str().unwrap().ends_with("bad\u{FFFD}name")));
}

#[test]
fn nonexistent_root_completes_with_walk_error() {
    let result = run(Path::new("/nonexistent/path/that/does/not/exist"), 4);

    assert_eq!(result.files_processed, 0);
    assert!(result.index.is_empty());
    assert_eq!(result.walk_errors.len(), 1);
}

#[test]
fn find_duplicates_returns_the_index() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("one").write_str("dup").unwrap();
    temp.child("two").write_str("dup").unwrap();

    let index = find_duplicates(temp.path()).unwrap();
    assert_eq!(index.duplicates().count(), 1);
}

#[test]
fn json_report_is_written_for_found_groups() {
    let temp = assert_fs::TempDir::new().unwrap();
    let data = temp.child("data");
    data.child("x.txt").write_str("hello").unwrap();
    data.child("y.txt").write_str("hello").unwrap();

    let result = run(data.path(), 2);
    let report = temp.child("duplicateFiles.json");
    write_json_report(&result.index.duplicate_groups(), report.path()).unwrap();

    report.assert(predicate::path::exists());
    report.assert(predicate::str::contains(r#""hash":"5d41402a""#));
    report.assert(predicate::str::contains("filePaths"));
}

#[test]
fn verification_removes_truncation_aliases() {
    let temp = assert_fs::TempDir::new().unwrap();
    // 40 distinct contents into 16 one-character fingerprints must alias.
    for i in 0..40 {
        temp.child(format!("f{i}")).write_str(&format!("distinct {i}")).unwrap();
    }

    let result = Pipeline::builder()
        .root(temp.path())
        .fingerprint_len(1)
        .build()
        .run()
        .unwrap();

    let groups = result.index.duplicate_groups();
    assert!(!groups.is_empty());

    let verified = verify_groups(&groups);
    assert!(verified.groups.is_empty());
    assert_eq!(verified.aliased_groups, groups.len());
}
