// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv` — the headless CLI surface driving the Session Service (§1
//! "two surfaces", §6 "CLI surface").

mod cli;
mod commands;
mod context;
mod exit_error;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use context::Context;
use exit_error::ExitError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    hv_daemon::init_tracing();

    let workspace_root = cli.workspace.clone().unwrap_or_else(|| std::path::PathBuf::from(".haivemind-workspace"));

    let code = match run(cli, workspace_root).await {
        Ok(()) => 0,
        Err(e) => match e.downcast::<ExitError>() {
            Ok(exit_err) => {
                eprintln!("{exit_err}");
                exit_err.code
            }
            Err(other) => {
                eprintln!("{other}");
                1
            }
        },
    };

    std::process::exit(code);
}

async fn run(cli: Cli, workspace_root: std::path::PathBuf) -> anyhow::Result<()> {
    let ctx = Context::new(workspace_root, cli.mock).await?;

    match cli.command {
        Command::Projects => commands::projects::handle(&ctx, cli.json).await,
        Command::Status { slug } => commands::status::handle(&ctx, &slug, cli.json).await,
        Command::Build { slug, prompt } => commands::build::handle(&ctx, &slug, &prompt, cli.json).await,
        Command::Replay { slug, sid } => commands::replay::handle(&ctx, &slug, &sid, cli.json).await,
        Command::Autopilot { slug, cycles } => commands::autopilot::handle(&ctx, &slug, cycles, cli.json).await,
    }
}
