use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tracker_core::action::Action;
use tracker_core::screens::test_suite::{CaseForm, CasePatch};
use tracker_core::screens::Screen;

#[derive(Args)]
pub struct CaseFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    preconditions: Option<String>,
    #[arg(long)]
    steps: Option<String>,
    #[arg(long)]
    expected: Option<String>,
    #[arg(long)]
    process_step: Option<String>,
    #[arg(long)]
    acceptance: Option<String>,
}

impl CaseFields {
    fn into_form(self) -> CaseForm {
        CaseForm {
            title: self.title.unwrap_or_default(),
            preconditions: self.preconditions.unwrap_or_default(),
            steps: self.steps.unwrap_or_default(),
            expected_result: self.expected.unwrap_or_default(),
            process_step: self.process_step.unwrap_or_default(),
            acceptance_criteria: self.acceptance.unwrap_or_default(),
        }
    }

    fn into_patch(self) -> CasePatch {
        CasePatch {
            title: self.title,
            preconditions: self.preconditions,
            steps: self.steps,
            expected_result: self.expected,
            process_step: self.process_step,
            acceptance_criteria: self.acceptance,
        }
    }
}

#[derive(Subcommand)]
pub enum SuiteSubcommand {
    /// Generate test cases (AI)
    Generate,
    /// Assign reviewers to the generated cases
    AssignReviewers,
    /// Approve the reviewed cases
    Approve,
    /// Add a case (title and expected result required)
    Add {
        #[command(flatten)]
        fields: CaseFields,
    },
    /// Edit a case; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        fields: CaseFields,
    },
    /// Duplicate a case
    Duplicate { id: String },
    /// Delete a case
    Delete { id: String },
    /// Leave a reviewer comment on a case
    Comment {
        id: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Download the test execution prompt and move on to Test Execution
    Prompt {
        /// Write the prompt to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show cases and approval state
    Show,
}

pub fn run(root: &Path, subcmd: SuiteSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SuiteSubcommand::Generate => {
            super::act(root, Action::GenerateCases, json, "Generated 3 test cases")
        }
        SuiteSubcommand::AssignReviewers => {
            super::act(root, Action::AssignReviewers, json, "Reviewers assigned")
        }
        SuiteSubcommand::Approve => super::act(root, Action::ApproveCases, json, "Cases Approved"),
        SuiteSubcommand::Add { fields } => {
            let (_, outcome) = super::apply(
                root,
                Action::AddCase {
                    case: fields.into_form(),
                },
            )?;
            let id = outcome.result["id"].as_str().unwrap_or_default().to_string();
            super::report(&outcome, json, &format!("Added case {id}"))
        }
        SuiteSubcommand::Edit { id, fields } => {
            let msg = format!("Updated case {id}");
            let patch = fields.into_patch();
            super::act(root, Action::EditCase { id, patch }, json, &msg)
        }
        SuiteSubcommand::Duplicate { id } => {
            let (_, outcome) = super::apply(root, Action::DuplicateCase { id: id.clone() })?;
            let new_id = outcome.result["id"].as_str().unwrap_or_default().to_string();
            super::report(&outcome, json, &format!("Duplicated {id} as {new_id}"))
        }
        SuiteSubcommand::Delete { id } => {
            let msg = format!("Deleted case {id}");
            super::act(root, Action::DeleteCase { id }, json, &msg)
        }
        SuiteSubcommand::Comment { id, text } => {
            let msg = format!("Commented on {id}");
            let comment = text.join(" ");
            super::act(root, Action::CommentCase { id, comment }, json, &msg)
        }
        SuiteSubcommand::Prompt { out } => prompt(root, out.as_deref(), json),
        SuiteSubcommand::Show => show(root, json),
    }
}

fn prompt(root: &Path, out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let (_, outcome) = super::apply(root, Action::DownloadPrompt)?;
    if json {
        return print_json(&outcome);
    }
    let text = outcome.result.as_str().unwrap_or_default();
    match out {
        Some(path) => {
            tracker_core::io::atomic_write(path, text.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Prompt written to {}", path.display());
        }
        None => print!("{text}"),
    }
    if let Some(t) = &outcome.transition {
        super::print_transition(t);
    }
    Ok(())
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let s = &session.screens.test_suite;
    if json {
        return print_json(&serde_json::json!({
            "status": s.case_status(),
            "average_coverage": s.average_coverage(),
            "suite": s,
        }));
    }

    println!(
        "{}  ·  reviewers {}  ·  avg coverage {}%",
        s.case_status(),
        if s.reviewers_assigned { "assigned" } else { "not assigned" },
        s.average_coverage()
    );
    println!();
    if s.cases.is_empty() {
        println!("No test cases. Run `tracker suite generate` or `tracker suite add`.");
    } else {
        let rows = s
            .cases
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    c.title.clone(),
                    c.process_step.clone(),
                    format!("{}%", c.coverage),
                    c.reviewer_comment.clone(),
                ]
            })
            .collect();
        print_table(&["ID", "TITLE", "PROCESS STEP", "COVERAGE", "COMMENT"], rows);
    }
    if let Some(reason) = s.gate().reason {
        println!("\n{}: {reason}", s.advance_action());
    }
    Ok(())
}
