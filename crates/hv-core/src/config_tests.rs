// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_config_has_expected_timeouts() {
    let config = Config::default();
    assert_eq!(config.agent_timeout_ms, 300_000);
    assert_eq!(config.orchestrator_timeout_ms, 300_000);
    assert_eq!(config.checkpoint_interval_ms, 10_000);
    assert_eq!(config.verify_max_rounds, 3);
    assert_eq!(config.timeline_cap, 5_000);
}

#[test]
fn tier_escalates_up_to_ceiling() {
    assert_eq!(ModelTier::T0.escalate(), ModelTier::T1);
    assert_eq!(ModelTier::T1.escalate(), ModelTier::T2);
    assert_eq!(ModelTier::T2.escalate(), ModelTier::T3);
    assert_eq!(ModelTier::T3.escalate(), ModelTier::T3);
}

#[test]
fn default_escalation_table_has_entries_per_tier() {
    let table = EscalationTable::default();
    assert!(!table.tier(ModelTier::T0).is_empty());
    assert!(!table.tier(ModelTier::T1).is_empty());
    assert!(!table.tier(ModelTier::T2).is_empty());
    assert!(!table.tier(ModelTier::T3).is_empty());
}

#[test]
fn project_overrides_replace_concurrency_and_ceiling() {
    let config = Config::default();
    let settings = ProjectSettings { cost_ceiling: Some(5), max_concurrency: 1, ..ProjectSettings::default() };
    let effective = config.with_project_overrides(&settings);
    assert_eq!(effective.cost_ceiling, Some(5));
    assert_eq!(effective.max_concurrency, 1);
    assert_eq!(effective.agent_timeout_ms, config.agent_timeout_ms);
}

#[test]
fn project_overrides_clamp_concurrency_to_at_least_one() {
    let config = Config::default();
    let settings = ProjectSettings { max_concurrency: 0, ..ProjectSettings::default() };
    let effective = config.with_project_overrides(&settings);
    assert_eq!(effective.max_concurrency, 1);
}

#[test]
fn from_toml_parses_partial_overrides() {
    let toml = r#"
        escalation = { t0 = [], t1 = [], t2 = [], t3 = [] }
        agent_timeout_ms = 60000
        orchestrator_timeout_ms = 60000
        checkpoint_interval_ms = 10000
        max_concurrency = 5
        max_retries_total = 3
        workspace_root = ".haivemind-workspace"
        timeline_cap = 5000
        agent_output_cap_bytes = 1048576
        kill_grace_ms = 5000
        verify_max_rounds = 3
    "#;
    let config = Config::from_toml(toml).expect("valid toml");
    assert_eq!(config.max_concurrency, 5);
}

#[test]
fn from_toml_rejects_garbage() {
    assert!(Config::from_toml("not valid toml {{{").is_err());
}
