use crate::prelude::Workspace;

#[test]
fn replay_prints_the_finalized_sessions_plan() {
    let ws = Workspace::new();
    let built = ws.hv().args(&["build", "demo", "add a readme"]).json().passes();
    let session_id = built.stdout_json()["id"].as_str().expect("id").to_string();

    ws.hv().args(&["replay", "demo", &session_id]).passes().stdout_has("task-0");
}

#[test]
fn replay_of_an_unknown_session_is_a_usage_error() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "add a readme"]).passes();

    let bogus_id = "00000000-0000-0000-0000-000000000000";
    ws.hv().args(&["replay", "demo", bogus_id]).fails_with(2);
}

#[test]
fn replay_rejects_a_malformed_session_id() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "add a readme"]).passes();

    ws.hv().args(&["replay", "demo", "not-a-uuid"]).fails_with(2);
}
