//! Every state-changing operation a stage screen offers, as one tagged enum.
//!
//! The CLI builds these from arguments and the server deserializes them from
//! request bodies; both hand them to [`crate::session::Session::apply`].

use crate::pipeline::Transition;
use crate::screens::coding::{TaskStatus, TaskTag};
use crate::screens::deployment::DeploymentStatus;
use crate::screens::design::DesignDoc;
use crate::screens::intake::{Review, UploadKind};
use crate::screens::test_suite::{CaseForm, CasePatch};
use crate::types::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    // Intake & BRD
    Upload { kind: UploadKind },
    RemoveUpload { id: String },
    GenerateBrd,
    SetReview { review: Review, checked: bool },
    ApproveBrd,
    ExportBrd,

    // Design
    ApproveDoc { doc: DesignDoc },
    AddLink { url: String },
    SetNotes { notes: String },

    // Coding tracker
    SetTaskStatus { id: String, status: TaskStatus },
    AddTask {
        title: String,
        tag: TaskTag,
        #[serde(default)]
        assignee: String,
        #[serde(default)]
        due_date: String,
    },
    ReadyForGates,

    // Build gates
    RunCheck { id: u32 },
    ToggleImportedTask { id: String },
    GenerateTestSuite,

    // Test suite
    GenerateCases,
    AssignReviewers,
    ApproveCases,
    AddCase { case: CaseForm },
    EditCase { id: String, patch: CasePatch },
    DuplicateCase { id: String },
    DeleteCase { id: String },
    CommentCase { id: String, comment: String },
    DownloadPrompt,

    // Test execution
    AssignDefect { id: String, assignee: String },
    ResolveDefect { id: String },
    RerunFailed,
    MarkReady,

    // Training
    GenerateDocs,
    Publish {
        audience: Vec<String>,
        #[serde(default)]
        link: Option<String>,
    },

    // Deployment
    SetDeploymentStatus { status: DeploymentStatus },
    SignOff { signed: bool },
    SetReleaseNotes { notes: String },
    Notify,
    GoLive,
}

impl Action {
    /// The screen this action belongs to.
    pub fn stage(&self) -> Stage {
        use Action::*;
        match self {
            Upload { .. } | RemoveUpload { .. } | GenerateBrd | SetReview { .. } | ApproveBrd
            | ExportBrd => Stage::IntakeBrd,
            ApproveDoc { .. } | AddLink { .. } | SetNotes { .. } => Stage::Design,
            SetTaskStatus { .. } | AddTask { .. } | ReadyForGates => Stage::CodingTracker,
            RunCheck { .. } | ToggleImportedTask { .. } | GenerateTestSuite => Stage::BuildGates,
            GenerateCases | AssignReviewers | ApproveCases | AddCase { .. } | EditCase { .. }
            | DuplicateCase { .. } | DeleteCase { .. } | CommentCase { .. } | DownloadPrompt => {
                Stage::TestSuite
            }
            AssignDefect { .. } | ResolveDefect { .. } | RerunFailed | MarkReady => {
                Stage::TestExecution
            }
            GenerateDocs | Publish { .. } => Stage::Training,
            SetDeploymentStatus { .. } | SignOff { .. } | SetReleaseNotes { .. } | Notify
            | GoLive => Stage::Deployment,
        }
    }

    /// Short name used in history entries and logs.
    pub fn name(&self) -> &'static str {
        use Action::*;
        match self {
            Upload { .. } => "upload",
            RemoveUpload { .. } => "remove_upload",
            GenerateBrd => "generate_brd",
            SetReview { .. } => "set_review",
            ApproveBrd => "approve_brd",
            ExportBrd => "export_brd",
            ApproveDoc { .. } => "approve_doc",
            AddLink { .. } => "add_link",
            SetNotes { .. } => "set_notes",
            SetTaskStatus { .. } => "set_task_status",
            AddTask { .. } => "add_task",
            ReadyForGates => "ready_for_gates",
            RunCheck { .. } => "run_check",
            ToggleImportedTask { .. } => "toggle_imported_task",
            GenerateTestSuite => "generate_test_suite",
            GenerateCases => "generate_cases",
            AssignReviewers => "assign_reviewers",
            ApproveCases => "approve_cases",
            AddCase { .. } => "add_case",
            EditCase { .. } => "edit_case",
            DuplicateCase { .. } => "duplicate_case",
            DeleteCase { .. } => "delete_case",
            CommentCase { .. } => "comment_case",
            DownloadPrompt => "download_prompt",
            AssignDefect { .. } => "assign_defect",
            ResolveDefect { .. } => "resolve_defect",
            RerunFailed => "rerun_failed",
            MarkReady => "mark_ready",
            GenerateDocs => "generate_docs",
            Publish { .. } => "publish",
            SetDeploymentStatus { .. } => "set_deployment_status",
            SignOff { .. } => "sign_off",
            SetReleaseNotes { .. } => "set_release_notes",
            Notify => "notify",
            GoLive => "go_live",
        }
    }

    /// True for the action that moves the pipeline past its screen.
    pub fn is_advance(&self) -> bool {
        matches!(
            self,
            Action::ApproveBrd
                | Action::ApproveDoc { doc: DesignDoc::Ui }
                | Action::ReadyForGates
                | Action::GenerateTestSuite
                | Action::DownloadPrompt
                | Action::MarkReady
                | Action::Publish { .. }
                | Action::GoLive
        )
    }
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub stage: Stage,
    pub action: &'static str,
    /// The record the action produced or touched, if any.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub result: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let a: Action = serde_json::from_str(r#"{"action":"upload","kind":"transcript"}"#).unwrap();
        assert!(matches!(a, Action::Upload { kind: UploadKind::Transcript }));
        assert_eq!(a.stage(), Stage::IntakeBrd);

        let a: Action =
            serde_json::from_str(r#"{"action":"publish","audience":["Sales"]}"#).unwrap();
        assert!(matches!(a, Action::Publish { link: None, .. }));
        assert!(a.is_advance());

        let a: Action = serde_json::from_str(r#"{"action":"approve_doc","doc":"functional"}"#).unwrap();
        assert!(!a.is_advance());
        let a: Action = serde_json::from_str(r#"{"action":"approve_doc","doc":"ui"}"#).unwrap();
        assert!(a.is_advance());
    }

    #[test]
    fn one_advance_action_per_stage() {
        let advances = [
            Action::ApproveBrd,
            Action::ApproveDoc { doc: DesignDoc::Ui },
            Action::ReadyForGates,
            Action::GenerateTestSuite,
            Action::DownloadPrompt,
            Action::MarkReady,
            Action::Publish { audience: vec![], link: None },
            Action::GoLive,
        ];
        let stages: Vec<Stage> = advances.iter().map(Action::stage).collect();
        assert_eq!(stages, Stage::all());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<Action>(r#"{"action":"deploy_everything"}"#).is_err());
    }
}
