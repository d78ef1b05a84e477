use crate::output::{check, print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;

#[derive(Subcommand)]
pub enum ExecutionSubcommand {
    /// Show the run summary, timeline and defects
    Show,
    /// Step-by-step playback of one run
    RunDetail { id: String },
    /// Assign a defect
    AssignDefect { id: String, assignee: String },
    /// Mark a defect resolved
    ResolveDefect { id: String },
    /// Re-run failed runs (needs every defect resolved)
    RerunFailed,
    /// Mark ready for deployment and move on to Training
    MarkReady,
}

pub fn run(root: &Path, subcmd: ExecutionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ExecutionSubcommand::Show => show(root, json),
        ExecutionSubcommand::RunDetail { id } => run_detail(root, &id, json),
        ExecutionSubcommand::AssignDefect { id, assignee } => {
            let msg = format!("{id} assigned to {assignee}");
            super::act(root, Action::AssignDefect { id, assignee }, json, &msg)
        }
        ExecutionSubcommand::ResolveDefect { id } => {
            let msg = format!("{id} resolved");
            super::act(root, Action::ResolveDefect { id }, json, &msg)
        }
        ExecutionSubcommand::RerunFailed => {
            let (_, outcome) = super::apply(root, Action::RerunFailed)?;
            let n = outcome.result["rerun"].as_u64().unwrap_or(0);
            super::report(&outcome, json, &format!("Re-ran {n} failed run(s)"))
        }
        ExecutionSubcommand::MarkReady => super::act(
            root,
            Action::MarkReady,
            json,
            "Marked ready for deployment",
        ),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let e = &session.screens.test_execution;
    let summary = e.summary();
    if json {
        return print_json(&serde_json::json!({
            "summary": summary,
            "runs": e.runs,
            "defects": e.defects,
        }));
    }

    println!(
        "Passed {}  Failed {}  Blocked {}  ·  Pass {}% (threshold {}%{})",
        summary.passed,
        summary.failed,
        summary.blocked,
        summary.pass_percentage,
        summary.threshold,
        if summary.threshold_met { ", met" } else { ", not met" }
    );
    println!();
    let rows = e
        .runs
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                format!("{:?}", r.status),
                format!("{}%", r.pass_rate),
                r.duration.clone(),
                r.environment.clone(),
                r.executor.clone(),
            ]
        })
        .collect();
    print_table(&["RUN", "STATUS", "PASS", "DURATION", "ENV", "EXECUTOR"], rows);

    if !e.defects.is_empty() {
        println!();
        let rows = e
            .defects
            .iter()
            .map(|d| {
                vec![
                    check(d.resolved).to_string(),
                    d.id.clone(),
                    format!("{} step {}", d.case_id, d.step),
                    d.error.clone(),
                    if d.assigned.is_empty() {
                        "-".to_string()
                    } else {
                        d.assigned.clone()
                    },
                ]
            })
            .collect();
        print_table(&["", "DEFECT", "WHERE", "ERROR", "ASSIGNED"], rows);
    }
    Ok(())
}

fn run_detail(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let run = session.screens.test_execution.run(id)?;
    if json {
        return print_json(run);
    }
    println!("{}  {:?}  {}  {}", run.id, run.status, run.duration, run.environment);
    let rows = run
        .steps
        .iter()
        .map(|s| {
            vec![
                s.step.to_string(),
                s.action.clone(),
                format!("{:?}", s.status),
                s.screenshot.clone(),
            ]
        })
        .collect();
    print_table(&["STEP", "ACTION", "STATUS", "SCREENSHOT"], rows);
    Ok(())
}
