use crate::prelude::Workspace;

#[test]
fn projects_is_empty_for_a_fresh_workspace() {
    let ws = Workspace::new();
    ws.hv().args(&["projects"]).passes().stdout_has("No projects yet");
}

#[test]
fn building_a_session_lazily_creates_the_project() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "add a readme"]).passes();

    ws.hv().args(&["projects"]).passes().stdout_has("demo");
}

#[test]
fn projects_json_lists_the_created_project() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "add a readme"]).passes();

    let run = ws.hv().args(&["projects"]).json().passes();
    let projects = run.stdout_json();
    let projects = projects.as_array().expect("array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["slug"], "demo");
}
