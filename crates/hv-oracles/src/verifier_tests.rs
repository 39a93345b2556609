// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hv_core::plan::Plan;
use hv_core::project::ProjectSkills;
use std::path::Path;

fn skills() -> ProjectSkills {
    ProjectSkills::default()
}

#[tokio::test]
async fn default_mock_verifier_passes_immediately() {
    let verifier = MockVerifier::new();
    let outcome = verifier.verify(&Plan::default(), Path::new("/work"), &skills()).await.unwrap();
    assert!(outcome.passed);
    assert!(outcome.issues.is_empty());
}

#[tokio::test]
async fn scripted_rounds_are_replayed_in_order() {
    let verifier = MockVerifier::script(vec![
        VerifyOutcome::fail(vec!["tests failing".into()], vec![]),
        VerifyOutcome::fail(vec!["one more issue".into()], vec![]),
        VerifyOutcome::pass(),
    ]);

    let round1 = verifier.verify(&Plan::default(), Path::new("/work"), &skills()).await.unwrap();
    assert!(!round1.passed);
    assert_eq!(round1.issues, vec!["tests failing".to_string()]);

    let round2 = verifier.verify(&Plan::default(), Path::new("/work"), &skills()).await.unwrap();
    assert_eq!(round2.issues, vec!["one more issue".to_string()]);

    let round3 = verifier.verify(&Plan::default(), Path::new("/work"), &skills()).await.unwrap();
    assert!(round3.passed);
}

#[tokio::test]
async fn exhausted_script_repeats_the_final_outcome() {
    let verifier = MockVerifier::script(vec![VerifyOutcome::fail(vec!["still broken".into()], vec![])]);
    for _ in 0..3 {
        let outcome = verifier.verify(&Plan::default(), Path::new("/work"), &skills()).await.unwrap();
        assert!(!outcome.passed);
    }
}
