use crate::prelude::Workspace;

#[test]
fn an_unrecognized_subcommand_is_a_clap_usage_error() {
    let ws = Workspace::new();
    ws.hv().args(&["frobnicate"]).fails_with(2);
}

#[test]
fn missing_required_arguments_is_a_clap_usage_error() {
    let ws = Workspace::new();
    ws.hv().args(&["build", "demo"]).fails_with(2);
}
