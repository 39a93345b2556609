// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extracts_files_changed_across_all_three_patterns() {
    let output = b"Creating file: src/main.rs\nModified file: src/lib.rs\ndiff --git a/README.md b/README.md\n";
    let summary = summarize(output);
    assert_eq!(summary.files_changed, vec!["src/main.rs", "src/lib.rs", "README.md"]);
}

#[test]
fn deduplicates_repeated_file_mentions() {
    let output = b"Creating file: src/main.rs\nModified file: src/main.rs\n";
    let summary = summarize(output);
    assert_eq!(summary.files_changed, vec!["src/main.rs"]);
}

#[test]
fn classifies_error_and_warning_lines() {
    let output = b"error: missing semicolon\nwarning: unused variable `x`\nall good\n";
    let summary = summarize(output);
    assert_eq!(summary.errors, vec!["error: missing semicolon"]);
    assert_eq!(summary.warnings, vec!["warning: unused variable `x`"]);
}

#[test]
fn parses_test_counts_from_a_summary_line() {
    let output = b"running tests...\n12 passed, 2 failed, 1 skipped\n";
    let summary = summarize(output);
    assert_eq!(summary.tests.passed, 12);
    assert_eq!(summary.tests.failed, 2);
    assert_eq!(summary.tests.skipped, 1);
}

#[test]
fn empty_output_yields_empty_summary() {
    let summary = summarize(b"");
    assert!(summary.files_changed.is_empty());
    assert!(summary.errors.is_empty());
    assert_eq!(summary.tests.passed, 0);
}

#[test]
fn digest_is_the_last_non_blank_line() {
    let summary = summarize(b"line one\nline two\n\n");
    assert_eq!(summary.digest, "line two");
}

#[test]
fn escalation_context_folds_prior_summary_into_the_prompt() {
    let prior = AgentSummary {
        files_changed: vec!["src/main.rs".into()],
        errors: vec!["error: boom".into()],
        digest: "build failed".into(),
        ..Default::default()
    };
    let context = escalation_context("fix the build", &prior);
    assert!(context.starts_with("fix the build"));
    assert!(context.contains("Previous Attempt Summary"));
    assert!(context.contains("build failed"));
    assert!(context.contains("src/main.rs"));
}
