// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn record_accumulates_totals_and_per_tier_counts() {
    let mut summary = CostSummary::default();
    summary.record(ModelTier::T1, 1);
    summary.record(ModelTier::T1, 1);
    summary.record(ModelTier::T2, 3);
    assert_eq!(summary.total_agents, 3);
    assert_eq!(summary.total_premium_requests, 5);
    assert_eq!(summary.per_tier[&ModelTier::T1], 2);
    assert_eq!(summary.per_tier[&ModelTier::T2], 1);
}

#[test]
fn free_tier_agents_count_toward_total_agents_not_premium_requests() {
    let mut summary = CostSummary::default();
    summary.record(ModelTier::T0, 0);
    assert_eq!(summary.total_agents, 1);
    assert_eq!(summary.total_premium_requests, 0);
}

#[test]
fn would_exceed_admits_exactly_at_ceiling() {
    let mut summary = CostSummary::default();
    summary.record(ModelTier::T1, 1);
    assert!(!summary.would_exceed(1, 2));
    assert!(summary.would_exceed(2, 2));
}

#[test]
fn would_exceed_true_when_ceiling_already_at_zero() {
    let summary = CostSummary::default();
    assert!(!summary.would_exceed(0, 0));
    assert!(summary.would_exceed(1, 0));
}

#[test]
fn serde_round_trip_preserves_per_tier_map() {
    let mut summary = CostSummary::default();
    summary.record(ModelTier::T3, 10);
    let json = serde_json::to_string(&summary).expect("serializes");
    let back: CostSummary = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, summary);
}
