// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv projects` — list every known project.

use crate::context::Context;
use crate::output::render;

pub async fn handle(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let mut projects = ctx.workspace.list_projects().await?;
    projects.sort_by(|a, b| a.slug.as_str().cmp(b.slug.as_str()));

    render(json, &projects, || {
        if projects.is_empty() {
            println!("No projects yet");
            return;
        }
        let name_w = projects.iter().map(|p| p.name.len()).max().unwrap_or(0).max(4);
        println!("{:<width$}  {:<24}  {}", "NAME", "SLUG", "CREATED", width = name_w);
        for project in &projects {
            println!(
                "{:<width$}  {:<24}  {}",
                project.name,
                project.slug.as_str(),
                crate::output::format_time_ago(project.created_at_epoch_ms),
                width = name_w,
            );
        }
    })
}
