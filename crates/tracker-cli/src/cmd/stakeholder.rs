use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use tracker_core::catalog;
use tracker_core::requirement::StakeholderForm;

#[derive(Subcommand)]
pub enum StakeholderSubcommand {
    /// Add a stakeholder to the active requirement
    Add {
        #[arg(long)]
        name: String,
        /// Function (repeatable), e.g. "POC – Coding" or "Business Owner"
        #[arg(long = "function", required = true)]
        functions: Vec<String>,
        #[arg(long)]
        team: String,
        /// SAP, Non-SAP or Cross-platform
        #[arg(long)]
        department: String,
    },
    /// Remove a stakeholder by id
    Remove { id: String },
    /// List stakeholders
    List,
    /// Show the allowed functions, teams and departments
    Options,
}

pub fn run(root: &Path, subcmd: StakeholderSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        StakeholderSubcommand::Add {
            name,
            functions,
            team,
            department,
        } => add(
            root,
            StakeholderForm {
                name,
                functions,
                team,
                department,
            },
            json,
        ),
        StakeholderSubcommand::Remove { id } => remove(root, &id, json),
        StakeholderSubcommand::List => list(root, json),
        StakeholderSubcommand::Options => options(json),
    }
}

fn add(root: &Path, form: StakeholderForm, json: bool) -> anyhow::Result<()> {
    let (mut session, _) = super::load(root)?;
    let added = session.add_stakeholder(form)?;
    session.save(root).context("failed to save session")?;

    if json {
        print_json(&added)?;
    } else {
        println!("Added stakeholder [{}]: {}", added.id, added.name);
    }
    Ok(())
}

fn remove(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (mut session, _) = super::load(root)?;
    let removed = session.remove_stakeholder(id)?;
    session.save(root).context("failed to save session")?;

    if json {
        print_json(&serde_json::json!({ "removed": removed.id }))?;
    } else {
        println!("Removed stakeholder [{}]: {}", removed.id, removed.name);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let stakeholders = &session.requirement().stakeholders;

    if json {
        return print_json(stakeholders);
    }
    if stakeholders.is_empty() {
        println!("No stakeholders.");
        return Ok(());
    }
    let rows = stakeholders
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.functions.join(", "),
                s.team.clone(),
                s.department.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "FUNCTIONS", "TEAM", "DEPARTMENT"], rows);
    Ok(())
}

fn options(json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "functions": catalog::FUNCTION_OPTIONS,
            "teams": catalog::TEAM_OPTIONS,
            "departments": catalog::DEPARTMENT_OPTIONS,
        }));
    }
    println!("Functions:   {}", catalog::FUNCTION_OPTIONS.join(", "));
    println!("Teams:       {}", catalog::TEAM_OPTIONS.join(", "));
    println!("Departments: {}", catalog::DEPARTMENT_OPTIONS.join(", "));
    Ok(())
}
