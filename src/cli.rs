// SPDX-License-Identifier: MIT
//! Non-interactive subcommands — `taskdeck list` and `taskdeck add`.
//!
//! Thin scripting surface over the same store the TUI uses. `--json` emits
//! machine-readable output; everything informational respects `--quiet`.

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::store::TaskStore;
use crate::task::{CreateTaskInput, TaskStatus};
use crate::validate;
use crate::view::{self, StatusFilter, TaskCounts};

/// `taskdeck list [--json] [--status pending|completed]`
pub async fn run_list(
    store: &TaskStore,
    filter: StatusFilter,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let spinner = start_spinner("Fetching tasks…", quiet || json);
    let result = store.tasks().await;
    if let Some(s) = &spinner {
        s.finish_and_clear();
    }
    let tasks = result?;

    let visible = view::filtered(&tasks, filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        if !quiet {
            println!("No tasks.");
        }
        return Ok(());
    }

    for task in &visible {
        let glyph = match task.status {
            TaskStatus::Completed => "✓",
            TaskStatus::Pending => "○",
        };
        println!("{glyph} {}  {}", task.id, task.title);
        if let Some(description) = &task.description {
            println!("    {description}");
        }
    }
    if !quiet {
        let counts = TaskCounts::of(&tasks);
        println!(
            "\n{} total — {} pending, {} completed",
            counts.all, counts.pending, counts.completed
        );
    }
    Ok(())
}

/// `taskdeck add <title> [--description …]`
pub async fn run_add(
    store: &TaskStore,
    title: &str,
    description: Option<&str>,
    quiet: bool,
) -> Result<()> {
    // Same checks the form runs — a bad input never reaches the gateway.
    let input = match validate::validate(title, description.unwrap_or_default()) {
        Ok(input) => input,
        Err(errors) => {
            for message in [errors.title, errors.description].into_iter().flatten() {
                eprintln!("error: {message}");
            }
            bail!("invalid task input");
        }
    };

    let spinner = start_spinner("Creating task…", quiet);
    let result = store
        .create(CreateTaskInput {
            title: input.title,
            description: input.description,
            status: None,
        })
        .await;
    if let Some(s) = &spinner {
        s.finish_and_clear();
    }

    let task = result?;
    if !quiet {
        println!("Created task {} — {}", task.id, task.title);
    }
    Ok(())
}

fn start_spinner(message: &'static str, suppressed: bool) -> Option<ProgressBar> {
    if suppressed {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(spinner)
}
