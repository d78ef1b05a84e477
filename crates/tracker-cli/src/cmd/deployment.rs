use crate::output::{check, print_json};
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;
use tracker_core::screens::deployment::DeploymentStatus;

#[derive(Subcommand)]
pub enum DeploymentSubcommand {
    /// Set the deployment status: pending-window, ready-for-go-live, deployed
    SetStatus { status: DeploymentStatus },
    /// Record (or with --revoke, withdraw) business sign-off
    SignOff {
        #[arg(long)]
        revoke: bool,
    },
    /// Replace the release notes
    Notes {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Notify stakeholders
    Notify,
    /// Go live and close the pipeline
    GoLive,
    /// Show deployment status, notes and acknowledgements
    Show,
}

pub fn run(root: &Path, subcmd: DeploymentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DeploymentSubcommand::SetStatus { status } => super::act(
            root,
            Action::SetDeploymentStatus { status },
            json,
            &format!("Deployment status: {status}"),
        ),
        DeploymentSubcommand::SignOff { revoke } => super::act(
            root,
            Action::SignOff { signed: !revoke },
            json,
            if revoke {
                "Business sign-off withdrawn"
            } else {
                "Business sign-off recorded"
            },
        ),
        DeploymentSubcommand::Notes { text } => super::act(
            root,
            Action::SetReleaseNotes {
                notes: text.join(" "),
            },
            json,
            "Release notes updated",
        ),
        DeploymentSubcommand::Notify => {
            let (_, outcome) = super::apply(root, Action::Notify)?;
            let n = outcome.result["recipients"]
                .as_array()
                .map(Vec::len)
                .unwrap_or(0);
            super::report(&outcome, json, &format!("Stakeholders notified ({n} recipients)"))
        }
        DeploymentSubcommand::GoLive => super::act(root, Action::GoLive, json, "Live"),
        DeploymentSubcommand::Show => show(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let d = &session.screens.deployment;
    if json {
        return print_json(d);
    }
    println!("Status: {}", d.status);
    println!("\nRelease notes:\n  {}", d.release_notes);
    println!(
        "\n{} Business sign-off  {} Training published",
        check(d.acknowledgements.business_sign_off),
        check(d.acknowledgements.training_published)
    );
    if let Some(last) = d.notifications.last() {
        println!(
            "\nLast notified {} ({} recipients)",
            last.sent_at.format("%Y-%m-%d %H:%M UTC"),
            last.recipients.len()
        );
    }
    if session.pipeline.is_finished() {
        println!("\nPipeline complete.");
    }
    Ok(())
}
