use crate::action::{Action, Outcome};
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::paths;
use crate::pipeline::{Pipeline, Transition};
use crate::requirement::{Requirement, RequirementForm, Stakeholder, StakeholderForm};
use crate::screens::design::DesignDoc;
use crate::screens::{Screen, Screens};
use crate::types::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub stage: Stage,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

// Settings taken from config.yaml on every load; never persisted in the session.
#[derive(Debug, Clone)]
struct Settings {
    current_user: String,
    history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let cfg = Config::new("");
        Self {
            current_user: cfg.current_user,
            history_limit: cfg.history_limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The requirement currently being worked: pipeline, screen states and an
/// action log. Persisted to `.tracker/session.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "default_version")]
    pub version: u32,
    pub pipeline: Pipeline,
    #[serde(default)]
    pub screens: Screens,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip)]
    settings: Settings,
}

fn default_version() -> u32 {
    1
}

impl Session {
    pub fn start(requirement: Requirement, config: &Config) -> Self {
        let mut session = Self {
            version: 1,
            pipeline: Pipeline::start(requirement),
            screens: Screens::default(),
            history: Vec::new(),
            last_updated: Utc::now(),
            settings: Settings::default(),
        };
        session.apply_config(config);
        session
    }

    /// Landing "create requirement".
    pub fn create(form: RequirementForm, config: &Config) -> Result<Self> {
        let requirement = Requirement::create(form, &config.current_user)?;
        Ok(Self::start(requirement, config))
    }

    /// Landing "open existing".
    pub fn open(id: &str, config: &Config) -> Result<Self> {
        let requirement = Requirement::lookup(id)?;
        Ok(Self::start(requirement, config))
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.settings = Settings {
            current_user: config.current_user.clone(),
            history_limit: config.history_limit,
        };
        self.screens.test_execution.threshold = config.execution.pass_threshold;
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::session_path(root);
        if !path.exists() {
            return Err(TrackerError::NoSession);
        }
        let data = std::fs::read_to_string(&path)?;
        let session: Session = serde_yaml::from_str(&data)?;
        Ok(session)
    }

    /// Load the session and overlay settings from `config.yaml`.
    pub fn load_with_config(root: &Path) -> Result<(Self, Config)> {
        let config = Config::load(root)?;
        let mut session = Self::load(root)?;
        session.apply_config(&config);
        Ok((session, config))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::session_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Landing / navigation
    // -----------------------------------------------------------------------

    pub fn requirement(&self) -> &Requirement {
        &self.pipeline.requirement
    }

    pub fn navigate(&mut self, stage: Stage) {
        self.pipeline.navigate(stage);
        self.touch();
    }

    pub fn add_stakeholder(&mut self, form: StakeholderForm) -> Result<Stakeholder> {
        let added = self
            .pipeline
            .requirement
            .add_stakeholder(form, &self.settings.current_user)?
            .clone();
        self.touch();
        Ok(added)
    }

    pub fn remove_stakeholder(&mut self, id: &str) -> Result<Stakeholder> {
        let removed = self.pipeline.requirement.remove_stakeholder(id)?;
        self.touch();
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Screen actions
    // -----------------------------------------------------------------------

    /// Apply one screen action. Advance actions are accepted only on the
    /// active stage and only while that screen's gate is open; a rejected
    /// action leaves the session untouched.
    pub fn apply(&mut self, action: Action) -> Result<Outcome> {
        let stage = action.stage();
        let name = action.name();
        if action.is_advance() {
            self.pipeline.ensure_active(stage)?;
        }

        let (result, transition) = self.dispatch(action)?;

        tracing::debug!(%stage, action = name, "action applied");
        self.record(stage, name);
        Ok(Outcome {
            stage,
            action: name,
            result,
            transition,
        })
    }

    fn dispatch(&mut self, action: Action) -> Result<(Value, Option<Transition>)> {
        let user = self.settings.current_user.clone();
        let req_id = self.pipeline.requirement.id.clone();
        let s = &mut self.screens;

        let value = match action {
            // Intake & BRD
            Action::Upload { kind } => to_value(s.intake.upload(kind, &user)?)?,
            Action::RemoveUpload { id } => to_value(&s.intake.remove_upload(&id)?)?,
            Action::GenerateBrd => to_value(s.intake.generate_brd()?)?,
            Action::SetReview { review, checked } => {
                s.intake.set_review(review, checked)?;
                to_value(&s.intake.reviews)?
            }
            Action::ApproveBrd => {
                s.intake.approve()?;
                return self.advance(Stage::IntakeBrd, Value::Null);
            }
            Action::ExportBrd => {
                let name = self.pipeline.requirement.name.clone();
                Value::String(s.intake.export_markdown(&req_id, &name)?)
            }

            // Design
            Action::ApproveDoc { doc: DesignDoc::Ui } => {
                s.design.approve(DesignDoc::Ui)?;
                return self.advance(Stage::Design, Value::Null);
            }
            Action::ApproveDoc { doc } => {
                s.design.approve(doc)?;
                json!({ "doc": doc, "status": s.design.status(doc) })
            }
            Action::AddLink { url } => {
                s.design.add_link(&url)?;
                to_value(&s.design.figma_links)?
            }
            Action::SetNotes { notes } => {
                s.design.set_notes(&notes);
                Value::Null
            }

            // Coding tracker
            Action::SetTaskStatus { id, status } => to_value(s.coding.set_status(&id, status)?)?,
            Action::AddTask {
                title,
                tag,
                assignee,
                due_date,
            } => {
                let assignee = if assignee.trim().is_empty() { user } else { assignee };
                to_value(s.coding.add_task(&title, tag, &assignee, &due_date)?)?
            }
            Action::ReadyForGates => {
                check_gate(&s.coding)?;
                return self.advance(Stage::CodingTracker, Value::Null);
            }

            // Build gates
            Action::RunCheck { id } => to_value(s.build_gates.run(id)?)?,
            Action::ToggleImportedTask { id } => to_value(s.build_gates.toggle_task(&id)?)?,
            Action::GenerateTestSuite => {
                check_gate(&s.build_gates)?;
                return self.advance(Stage::BuildGates, Value::Null);
            }

            // Test suite
            Action::GenerateCases => to_value(s.test_suite.generate())?,
            Action::AssignReviewers => {
                s.test_suite.assign_reviewers()?;
                Value::Null
            }
            Action::ApproveCases => {
                s.test_suite.approve()?;
                json!({ "status": s.test_suite.case_status() })
            }
            Action::AddCase { case } => to_value(s.test_suite.add(case)?)?,
            Action::EditCase { id, patch } => to_value(s.test_suite.edit(&id, patch)?)?,
            Action::DuplicateCase { id } => to_value(s.test_suite.duplicate(&id)?)?,
            Action::DeleteCase { id } => to_value(&s.test_suite.delete(&id)?)?,
            Action::CommentCase { id, comment } => to_value(s.test_suite.comment(&id, &comment)?)?,
            Action::DownloadPrompt => {
                let prompt = s.test_suite.execution_prompt(&req_id)?;
                return self.advance(Stage::TestSuite, Value::String(prompt));
            }

            // Test execution
            Action::AssignDefect { id, assignee } => {
                to_value(s.test_execution.assign_defect(&id, &assignee)?)?
            }
            Action::ResolveDefect { id } => to_value(s.test_execution.resolve_defect(&id)?)?,
            Action::RerunFailed => {
                let rerun = s.test_execution.rerun_failed()?;
                json!({ "rerun": rerun, "summary": s.test_execution.summary() })
            }
            Action::MarkReady => {
                check_gate(&s.test_execution)?;
                return self.advance(Stage::TestExecution, Value::Null);
            }

            // Training
            Action::GenerateDocs => to_value(s.training.generate())?,
            Action::Publish { audience, link } => {
                let publication = to_value(s.training.publish(&audience, link.as_deref())?)?;
                return self.advance(Stage::Training, publication);
            }

            // Deployment
            Action::SetDeploymentStatus { status } => {
                s.deployment.set_status(status);
                json!({ "status": status })
            }
            Action::SignOff { signed } => {
                s.deployment.sign_off(signed);
                to_value(&s.deployment.acknowledgements)?
            }
            Action::SetReleaseNotes { notes } => {
                s.deployment.set_release_notes(&notes);
                Value::Null
            }
            Action::Notify => to_value(s.deployment.notify(&req_id))?,
            Action::GoLive => {
                check_gate(&s.deployment)?;
                let t = self.pipeline.complete_final()?;
                return Ok((Value::Null, Some(t)));
            }
        };
        Ok((value, None))
    }

    fn advance(&mut self, stage: Stage, result: Value) -> Result<(Value, Option<Transition>)> {
        let t = self.pipeline.advance(stage)?;
        Ok((result, Some(t)))
    }

    fn record(&mut self, stage: Stage, action: &str) {
        self.history.push(HistoryEntry {
            stage,
            action: action.to_string(),
            timestamp: Utc::now(),
        });
        let limit = self.settings.history_limit;
        if self.history.len() > limit {
            self.history.drain(..self.history.len() - limit);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

fn check_gate(screen: &dyn Screen) -> Result<()> {
    screen.advance_gate().map_err(TrackerError::blocked)
}

fn to_value<T: Serialize + ?Sized>(v: &T) -> Result<Value> {
    Ok(serde_json::to_value(v)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
