use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;
use tracker_core::action::Action;
use tracker_core::screens::design::{DesignDoc, DocStatus, Section};

#[derive(Subcommand)]
pub enum DesignSubcommand {
    /// Approve a design document: fd, td or ui (ui moves on to Coding)
    Approve { doc: DesignDoc },
    /// Attach a Figma link
    Link { url: String },
    /// Replace the UI notes
    Notes {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show design documents, links and notes
    Show,
}

pub fn run(root: &Path, subcmd: DesignSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DesignSubcommand::Approve { doc } => {
            super::act(root, Action::ApproveDoc { doc }, json, &format!("{doc} approved"))
        }
        DesignSubcommand::Link { url } => {
            let msg = format!("Linked {url}");
            super::act(root, Action::AddLink { url }, json, &msg)
        }
        DesignSubcommand::Notes { text } => super::act(
            root,
            Action::SetNotes {
                notes: text.join(" "),
            },
            json,
            "Notes updated",
        ),
        DesignSubcommand::Show => show(root, json),
    }
}

fn status_label(s: DocStatus) -> &'static str {
    match s {
        DocStatus::InReview => "In Review",
        DocStatus::Approved => "Approved",
    }
}

fn print_sections(sections: &[Section]) {
    for s in sections {
        println!("  {}", s.title);
        for item in &s.items {
            println!("    - {item}");
        }
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let d = &session.screens.design;
    if json {
        return print_json(d);
    }

    println!("{} [{}]", DesignDoc::Functional, status_label(d.functional));
    print_sections(&d.functional_sections);
    println!("\n{} [{}]", DesignDoc::Technical, status_label(d.technical));
    print_sections(&d.technical_sections);
    println!("\n{} [{}]", DesignDoc::Ui, status_label(d.ui));
    for link in &d.figma_links {
        println!("  {link}");
    }
    println!("\nNotes: {}", d.notes);
    Ok(())
}
