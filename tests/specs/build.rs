use crate::prelude::Workspace;

#[test]
fn build_completes_the_default_single_task_plan() {
    let ws = Workspace::new();
    let run = ws.hv().args(&["build", "demo", "add a readme"]).passes();
    run.stdout_has("Completed");
    run.stdout_has("task-0");
}

#[test]
fn build_json_reports_a_completed_session() {
    let ws = Workspace::new();
    let run = ws.hv().args(&["build", "demo", "add a readme"]).json().passes();
    let session = run.stdout_json();
    assert_eq!(session["status"], "completed");
    assert_eq!(session["plan"]["tasks"][0]["status"], "done");
}

#[test]
fn rejects_an_invalid_project_slug() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "Not A Slug", "hello"]).fails_with(2).stderr_has("Not A Slug");
}
