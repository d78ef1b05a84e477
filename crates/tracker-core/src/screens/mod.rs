//! Per-stage screen state.
//!
//! Every screen owns its own working data, seeded from fixed mock records,
//! and a gate predicate deciding whether its advance action is enabled.
//! Screens never read each other's state; the only way out of a screen is
//! the advance signal handled by [`crate::session::Session`].

pub mod build_gates;
pub mod coding;
pub mod deployment;
pub mod design;
pub mod intake;
pub mod landing;
pub mod test_execution;
pub mod test_suite;
pub mod training;

use crate::types::Stage;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub trait Screen {
    fn stage(&self) -> Stage;

    /// Label of the button that moves the pipeline past this screen.
    fn advance_action(&self) -> &'static str;

    /// `Err` with the user-facing message while the advance button is disabled.
    fn advance_gate(&self) -> Result<(), &'static str>;

    fn gate(&self) -> Gate {
        let check = self.advance_gate();
        Gate {
            stage: self.stage(),
            action: self.advance_action(),
            open: check.is_ok(),
            reason: check.err(),
        }
    }
}

/// Serializable snapshot of a screen's advance gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gate {
    pub stage: Stage,
    pub action: &'static str,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Local state of every stage screen for one requirement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Screens {
    #[serde(default)]
    pub intake: intake::IntakeScreen,
    #[serde(default)]
    pub design: design::DesignScreen,
    #[serde(default)]
    pub coding: coding::CodingScreen,
    #[serde(default)]
    pub build_gates: build_gates::BuildGatesScreen,
    #[serde(default)]
    pub test_suite: test_suite::TestSuiteScreen,
    #[serde(default)]
    pub test_execution: test_execution::TestExecutionScreen,
    #[serde(default)]
    pub training: training::TrainingScreen,
    #[serde(default)]
    pub deployment: deployment::DeploymentScreen,
}

impl Screens {
    pub fn get(&self, stage: Stage) -> &dyn Screen {
        match stage {
            Stage::IntakeBrd => &self.intake,
            Stage::Design => &self.design,
            Stage::CodingTracker => &self.coding,
            Stage::BuildGates => &self.build_gates,
            Stage::TestSuite => &self.test_suite,
            Stage::TestExecution => &self.test_execution,
            Stage::Training => &self.training,
            Stage::Deployment => &self.deployment,
        }
    }

    pub fn gates(&self) -> Vec<Gate> {
        Stage::all().iter().map(|&s| self.get(s).gate()).collect()
    }

    /// JSON view of one screen's state.
    pub fn to_json(&self, stage: Stage) -> serde_json::Result<serde_json::Value> {
        match stage {
            Stage::IntakeBrd => serde_json::to_value(&self.intake),
            Stage::Design => serde_json::to_value(&self.design),
            Stage::CodingTracker => serde_json::to_value(&self.coding),
            Stage::BuildGates => serde_json::to_value(&self.build_gates),
            Stage::TestSuite => serde_json::to_value(&self.test_suite),
            Stage::TestExecution => serde_json::to_value(&self.test_execution),
            Stage::Training => serde_json::to_value(&self.training),
            Stage::Deployment => serde_json::to_value(&self.deployment),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

static URL_RE: OnceLock<Regex> = OnceLock::new();

/// Absolute http(s) URL with a host.
pub fn is_valid_url(s: &str) -> bool {
    URL_RE
        .get_or_init(|| {
            Regex::new(r"^https?://[A-Za-z0-9\-._~%]+(:[0-9]+)?(/\S*)?$").expect("static pattern")
        })
        .is_match(s)
}

/// Integer percentage of `part` in `whole`, rounded half up. Zero when empty.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}
