use crate::output::{check, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracker_core::action::Action;
use tracker_core::screens::intake::{Review, UploadKind};
use tracker_core::screens::Screen;

#[derive(Subcommand)]
pub enum IntakeSubcommand {
    /// Record an input (transcript, brd, url, screenshot, diagram, notes)
    Upload { kind: UploadKind },
    /// Remove an input by id
    Remove { id: String },
    /// Generate the BRD from the recorded inputs
    Generate,
    /// Tick (or clear) a review checkbox: business, functional, final
    Review {
        review: Review,
        #[arg(long)]
        uncheck: bool,
    },
    /// Approve the BRD and move on to Design
    Approve,
    /// Show inputs, BRD and reviews
    Show,
    /// Export the BRD as Markdown
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: IntakeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IntakeSubcommand::Upload { kind } => {
            let (_, outcome) = super::apply(root, Action::Upload { kind })?;
            let name = outcome.result["name"].as_str().unwrap_or_default().to_string();
            let id = outcome.result["id"].as_str().unwrap_or_default().to_string();
            super::report(&outcome, json, &format!("Uploaded [{id}]: {name}"))
        }
        IntakeSubcommand::Remove { id } => {
            let msg = format!("Removed input [{id}]");
            super::act(root, Action::RemoveUpload { id }, json, &msg)
        }
        IntakeSubcommand::Generate => {
            super::act(root, Action::GenerateBrd, json, "BRD generated (Draft)")
        }
        IntakeSubcommand::Review { review, uncheck } => {
            let msg = format!(
                "{} review {}",
                serde_json::to_value(review)?.as_str().unwrap_or_default(),
                if uncheck { "cleared" } else { "checked" }
            );
            super::act(
                root,
                Action::SetReview {
                    review,
                    checked: !uncheck,
                },
                json,
                &msg,
            )
        }
        IntakeSubcommand::Approve => super::act(root, Action::ApproveBrd, json, "BRD approved"),
        IntakeSubcommand::Show => show(root, json),
        IntakeSubcommand::Export { out } => export(root, out.as_deref(), json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let intake = &session.screens.intake;
    if json {
        return print_json(intake);
    }

    if intake.uploads.is_empty() {
        println!("No inputs yet.");
    } else {
        let rows = intake
            .uploads
            .iter()
            .map(|u| {
                vec![
                    u.id.clone(),
                    u.kind.to_string(),
                    u.name.clone(),
                    u.owner.clone(),
                    u.version.clone(),
                    format!("{:?}", u.validation).to_uppercase(),
                ]
            })
            .collect();
        print_table(&["ID", "KIND", "NAME", "OWNER", "VERSION", "VALID"], rows);
    }
    println!();

    match &intake.brd {
        None => println!("BRD: not generated"),
        Some(brd) => {
            println!("BRD: {}", intake.brd_status);
            for (title, items) in brd.sections() {
                println!("\n{title}");
                for item in items {
                    println!("  - {item}");
                }
            }
        }
    }
    println!();
    let r = intake.reviews;
    println!(
        "{} Business  {} Functional  {} Final",
        check(r.business),
        check(r.functional),
        check(r.final_approval)
    );
    let gate = intake.gate();
    if let Some(reason) = gate.reason {
        println!("{}: {reason}", gate.action);
    }
    Ok(())
}

fn export(root: &Path, out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let (_, outcome) = super::apply(root, Action::ExportBrd)?;
    let markdown = outcome.result.as_str().unwrap_or_default();
    match out {
        Some(path) => {
            tracker_core::io::atomic_write(path, markdown.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            if json {
                print_json(&serde_json::json!({ "written": path }))?;
            } else {
                println!("BRD exported to {}", path.display());
            }
        }
        None if json => print_json(&outcome)?,
        None => print!("{markdown}"),
    }
    Ok(())
}
