use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;
use tracker_core::screens::coding::{TaskStatus, TaskTag};

#[derive(Subcommand)]
pub enum CodingSubcommand {
    /// List coding tasks
    List,
    /// Change a task's status ("Generation queued", generated, refined, "Ready for Gates")
    SetStatus { id: String, status: TaskStatus },
    /// Add a task
    Add {
        #[arg(long)]
        title: String,
        /// ui5, abap, api or config
        #[arg(long)]
        tag: TaskTag,
        #[arg(long, default_value = "")]
        assignee: String,
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Hand off to Build Gates (needs a task Ready for Gates)
    Ready,
}

pub fn run(root: &Path, subcmd: CodingSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CodingSubcommand::List => list(root, json),
        CodingSubcommand::SetStatus { id, status } => {
            let msg = format!("Task [{id}] → {status}");
            super::act(root, Action::SetTaskStatus { id, status }, json, &msg)
        }
        CodingSubcommand::Add {
            title,
            tag,
            assignee,
            due,
        } => {
            let (_, outcome) = super::apply(
                root,
                Action::AddTask {
                    title: title.clone(),
                    tag,
                    assignee,
                    due_date: due,
                },
            )?;
            let id = outcome.result["id"].as_str().unwrap_or_default().to_string();
            super::report(&outcome, json, &format!("Added task [{id}]: {title}"))
        }
        CodingSubcommand::Ready => {
            super::act(root, Action::ReadyForGates, json, "Handed off to Build Gates")
        }
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let tasks = &session.screens.coding.tasks;
    if json {
        return print_json(tasks);
    }
    let rows = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.title.clone(),
                t.tag.to_string(),
                t.team.clone(),
                t.assignee.clone(),
                t.status.to_string(),
                t.due_date.clone(),
                t.last_updated.clone(),
            ]
        })
        .collect();
    print_table(
        &["ID", "TITLE", "TAG", "TEAM", "ASSIGNEE", "STATUS", "DUE", "UPDATED"],
        rows,
    );
    Ok(())
}
