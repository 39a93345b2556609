use crate::prelude::Workspace;

#[test]
fn status_on_an_unknown_project_is_a_usage_error() {
    let ws = Workspace::new();
    ws.hv().args(&["status", "ghost"]).fails_with(2).stderr_has("ghost");
}

#[test]
fn status_lists_sessions_after_a_build() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "add a readme"]).passes();

    ws.hv().args(&["status", "demo"]).passes().stdout_has("completed");
}

#[test]
fn status_scopes_sessions_to_their_own_project() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "first prompt"]).passes();
    ws.hv().args(&["build", "other", "first prompt"]).passes();

    let run = ws.hv().args(&["status", "demo"]).json().passes();
    let sessions = run.stdout_json();
    assert_eq!(sessions.as_array().expect("array").len(), 1);
}
