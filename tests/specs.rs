//! Behavioral specifications for the `hv` CLI.
//!
//! Black-box: invoke the binary against a temporary workspace and
//! check stdout/stderr/exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/projects.rs"]
mod projects;
#[path = "specs/build.rs"]
mod build;
#[path = "specs/status.rs"]
mod status;
#[path = "specs/replay.rs"]
mod replay;
#[path = "specs/autopilot.rs"]
mod autopilot;
#[path = "specs/errors.rs"]
mod errors;
