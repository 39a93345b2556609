// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn create_produces_a_non_empty_archive() {
    let work_dir = tempdir().unwrap();
    std::fs::write(work_dir.path().join("a.txt"), b"hello").unwrap();
    let snapshots_dir = tempdir().unwrap();

    let snapshot = TarballSnapshot::new(snapshots_dir.path());
    let snapshot_ref = snapshot.create(work_dir.path()).await.unwrap();

    let archive_path = snapshots_dir.path().join(format!("{snapshot_ref}.tar.gz"));
    assert!(archive_len(&archive_path) > 0);
}

#[tokio::test]
async fn rollback_restores_files_removed_after_the_snapshot() {
    let work_dir = tempdir().unwrap();
    std::fs::write(work_dir.path().join("a.txt"), b"hello").unwrap();
    let snapshots_dir = tempdir().unwrap();
    let snapshot = TarballSnapshot::new(snapshots_dir.path());

    let snapshot_ref = snapshot.create(work_dir.path()).await.unwrap();

    std::fs::remove_file(work_dir.path().join("a.txt")).unwrap();
    std::fs::write(work_dir.path().join("b.txt"), b"new").unwrap();
    assert!(!work_dir.path().join("a.txt").exists());

    snapshot.rollback(work_dir.path(), &snapshot_ref).await.unwrap();

    assert!(work_dir.path().join("a.txt").exists());
    assert!(!work_dir.path().join("b.txt").exists());
}

#[tokio::test]
async fn rollback_of_an_unknown_ref_fails_with_not_found() {
    let work_dir = tempdir().unwrap();
    let snapshots_dir = tempdir().unwrap();
    let snapshot = TarballSnapshot::new(snapshots_dir.path());

    let err = snapshot.rollback(work_dir.path(), "does-not-exist").await.unwrap_err();
    assert!(matches!(err, OracleError::NotFound(_)));
}

#[tokio::test]
async fn successive_snapshots_of_the_same_workspace_get_distinct_refs() {
    let work_dir = tempdir().unwrap();
    std::fs::write(work_dir.path().join("a.txt"), b"hello").unwrap();
    let snapshots_dir = tempdir().unwrap();
    let snapshot = TarballSnapshot::new(snapshots_dir.path());

    let first = snapshot.create(work_dir.path()).await.unwrap();
    let second = snapshot.create(work_dir.path()).await.unwrap();
    assert_ne!(first, second);
}
