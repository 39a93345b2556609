// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument parsing for the `hv` binary (§6 "CLI surface").

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hv", version, about = "hAIvemind session orchestration engine")]
pub struct Cli {
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip the Verify-Fix Loop (§4.5 step 8 "unless mock").
    #[arg(long, global = true)]
    pub mock: bool,

    /// Workspace root directory. Defaults to `.haivemind-workspace`
    /// under the current directory.
    #[arg(long, global = true)]
    pub workspace: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every known project.
    Projects,

    /// Show a project's most recent sessions.
    Status {
        slug: String,
    },

    /// Start (or continue) a session with a prompt.
    Build {
        slug: String,
        prompt: String,
    },

    /// Print a finalized session's plan, agents, and timeline.
    Replay {
        slug: String,
        #[arg(value_name = "SESSION_ID")]
        sid: String,
    },

    /// Run the bounded autopilot loop against a project's last session.
    Autopilot {
        slug: String,
        /// Override `maxCycles` (§4.7 Inputs).
        #[arg(long, default_value_t = 3)]
        cycles: u32,
    },
}
