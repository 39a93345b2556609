// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output summarization: a pure function from an agent's raw output
//! buffer to a structured [`AgentSummary`] (§4.2 "Output
//! summarization"). Files-changed is extracted by regex over the
//! three patterns the spec names; test counts and error/warning lines
//! are recovered with the same best-effort line-scan approach.

use hv_core::agent::{AgentSummary, TestCounts};
use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn files_changed_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?m)^Creating file: (?P<path>\S+)").expect("constant regex pattern is valid"),
            Regex::new(r"(?m)^Modified file: (?P<path>\S+)").expect("constant regex pattern is valid"),
            Regex::new(r"(?m)^diff --git a/(?P<path>\S+) b/\S+").expect("constant regex pattern is valid"),
        ]
    })
}

#[allow(clippy::expect_used)]
fn test_summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?P<passed>\d+)\s+passed(?:,\s*(?P<failed>\d+)\s+failed)?(?:,\s*(?P<skipped>\d+)\s+skipped)?")
            .expect("constant regex pattern is valid")
    })
}

/// Summarize an agent's raw output buffer (§4.2). Best-effort:
/// malformed or unrecognized output simply yields empty fields rather
/// than failing.
pub fn summarize(output: &[u8]) -> AgentSummary {
    let text = String::from_utf8_lossy(output);

    let mut files_changed = Vec::new();
    for pattern in files_changed_patterns() {
        for captures in pattern.captures_iter(&text) {
            if let Some(path) = captures.name("path") {
                let path = path.as_str().to_string();
                if !files_changed.contains(&path) {
                    files_changed.push(path);
                }
            }
        }
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut commands = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('$') {
            commands.push(trimmed.trim_start_matches('$').trim().to_string());
        } else if trimmed.to_ascii_lowercase().contains("error") {
            errors.push(trimmed.to_string());
        } else if trimmed.to_ascii_lowercase().contains("warning") {
            warnings.push(trimmed.to_string());
        }
    }

    let tests = test_summary_pattern()
        .captures(&text)
        .map(|c| TestCounts {
            passed: c.name("passed").and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
            failed: c.name("failed").and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
            skipped: c.name("skipped").and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
        })
        .unwrap_or_default();

    let digest = text.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("").trim().to_string();

    AgentSummary { files_changed, errors, warnings, commands, tests, digest }
}

/// Fold a prior attempt's summary into escalation context for a retry
/// (§4.2 "Summaries on retries are fed forward as escalation context").
pub fn escalation_context(prompt: &str, prior: &AgentSummary) -> String {
    format!(
        "{prompt}\n\nPrevious Attempt Summary\n{}\nfiles changed: {}\nerrors: {}\n",
        prior.digest,
        prior.files_changed.join(", "),
        prior.errors.join("; "),
    )
}

#[cfg(test)]
#[path = "summarizer_tests.rs"]
mod tests;
