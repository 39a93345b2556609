use crate::prelude::Workspace;

#[test]
fn autopilot_without_a_prior_session_is_a_usage_error() {
    let ws = Workspace::new();
    ws.hv().args(&["autopilot", "demo"]).fails_with(2).stderr_has("demo");
}

#[test]
fn autopilot_stops_at_max_cycles() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo", "seed prompt"]).passes();

    ws.hv()
        .args(&["autopilot", "demo", "--cycles", "2"])
        .passes()
        .stdout_has("reached max cycles");
}
