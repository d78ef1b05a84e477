use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;
use tracker_core::catalog::AUDIENCE_OPTIONS;

#[derive(Subcommand)]
pub enum TrainingSubcommand {
    /// Generate training documents (AI)
    Generate,
    /// Publish to an audience and move on to Deployment
    Publish {
        /// Sales, Operations or IT (repeatable)
        #[arg(long = "audience")]
        audience: Vec<String>,
        /// Link to the hosted material
        #[arg(long)]
        link: Option<String>,
    },
    /// Show training documents and publication
    Show,
}

pub fn run(root: &Path, subcmd: TrainingSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TrainingSubcommand::Generate => {
            super::act(root, Action::GenerateDocs, json, "Training documents generated")
        }
        TrainingSubcommand::Publish { audience, link } => {
            let msg = format!("Published to {}", audience.join(", "));
            super::act(root, Action::Publish { audience, link }, json, &msg)
        }
        TrainingSubcommand::Show => show(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let t = &session.screens.training;
    if json {
        return print_json(t);
    }

    if !t.generated {
        println!("Documents not generated yet.\n");
    }
    let rows = t
        .docs
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                serde_json::to_value(d.kind)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                d.title.clone(),
                d.audience.join(", "),
                d.version.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "TITLE", "AUDIENCE", "VERSION"], rows);

    println!();
    match &t.publication {
        Some(p) => println!(
            "Published to {} on {}{}",
            p.audience.join(", "),
            p.published_at.format("%Y-%m-%d %H:%M UTC"),
            p.link.as_deref().map(|l| format!(" ({l})")).unwrap_or_default()
        ),
        None => println!("Not published. Audiences: {}", AUDIENCE_OPTIONS.join(", ")),
    }
    Ok(())
}
