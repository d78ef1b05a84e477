use crate::output::{check, print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;

#[derive(Subcommand)]
pub enum GatesSubcommand {
    /// Run a quality stage by number (1 code quality, 2 security, 3 peer review)
    Run { id: u32 },
    /// Show the evidence report for a quality stage
    Evidence { id: u32 },
    /// Tick or clear an auto-imported review task
    Toggle { id: String },
    /// Show quality stages, peer reviews and imported tasks
    Show,
    /// Generate the test suite and move on (needs every stage to pass)
    GenerateSuite,
}

pub fn run(root: &Path, subcmd: GatesSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GatesSubcommand::Run { id } => {
            let (_, outcome) = super::apply(root, Action::RunCheck { id })?;
            let name = outcome.result["name"].as_str().unwrap_or_default().to_string();
            super::report(&outcome, json, &format!("{name}: Pass"))
        }
        GatesSubcommand::Evidence { id } => evidence(root, id, json),
        GatesSubcommand::Toggle { id } => {
            let msg = format!("Toggled task [{id}]");
            super::act(root, Action::ToggleImportedTask { id }, json, &msg)
        }
        GatesSubcommand::Show => show(root, json),
        GatesSubcommand::GenerateSuite => super::act(
            root,
            Action::GenerateTestSuite,
            json,
            "Test suite generation started",
        ),
    }
}

fn evidence(root: &Path, id: u32, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let evidence = session.screens.build_gates.evidence(id)?;
    if json {
        return print_json(&evidence);
    }
    println!("{}", evidence.title);
    for line in evidence.lines {
        println!("  {line}");
    }
    Ok(())
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let g = &session.screens.build_gates;
    if json {
        return print_json(g);
    }

    let rows = g
        .checks
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone(), c.status.to_string()])
        .collect();
    print_table(&["#", "STAGE", "STATUS"], rows);

    println!("\nPeer reviews");
    for r in &g.peer_reviews {
        println!("  {}: {}", r.reviewer, r.status);
    }
    println!("\nImported tasks");
    for t in &g.imported_tasks {
        println!("  {} [{}] {}", check(t.completed), t.id, t.task);
    }
    Ok(())
}
