pub mod coding;
pub mod config;
pub mod dashboard;
pub mod deployment;
pub mod design;
pub mod execution;
pub mod gates;
pub mod init;
pub mod intake;
pub mod nav;
pub mod requirement;
pub mod serve;
pub mod stakeholder;
pub mod suite;
pub mod training;
pub mod view;

use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tracker_core::action::{Action, Outcome};
use tracker_core::config::Config;
use tracker_core::pipeline::Transition;
use tracker_core::session::Session;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub fn load(root: &Path) -> anyhow::Result<(Session, Config)> {
    Session::load_with_config(root).context("failed to load session")
}

/// Load the session, apply one screen action and save. Nothing is written
/// when the action is rejected.
pub fn apply(root: &Path, action: Action) -> anyhow::Result<(Session, Outcome)> {
    let (mut session, _) = load(root)?;
    let outcome = session.apply(action)?;
    session.save(root).context("failed to save session")?;
    Ok((session, outcome))
}

/// Print an action outcome: the raw outcome as JSON, or `message` followed
/// by the pipeline move, if any.
pub fn report(outcome: &Outcome, json: bool, message: &str) -> anyhow::Result<()> {
    if json {
        return print_json(outcome);
    }
    println!("{message}");
    if let Some(t) = &outcome.transition {
        print_transition(t);
    }
    Ok(())
}

pub fn print_transition(t: &Transition) {
    match (t.to, t.to_status) {
        (Some(to), Some(status)) => println!(
            "{}: {}. Now on {} ({}).",
            t.from.label(),
            t.from_status,
            to.label(),
            status
        ),
        _ => println!("{}: {}. Pipeline complete.", t.from.label(), t.from_status),
    }
}

/// Apply `action` and report it with a fixed message.
pub fn act(root: &Path, action: Action, json: bool, message: &str) -> anyhow::Result<()> {
    let (_, outcome) = apply(root, action)?;
    report(&outcome, json, message)
}
