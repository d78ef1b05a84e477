use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    IntakeBrd,
    Design,
    CodingTracker,
    BuildGates,
    TestSuite,
    TestExecution,
    Training,
    Deployment,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::IntakeBrd,
            Stage::Design,
            Stage::CodingTracker,
            Stage::BuildGates,
            Stage::TestSuite,
            Stage::TestExecution,
            Stage::Training,
            Stage::Deployment,
        ]
    }

    pub fn first() -> Stage {
        Stage::IntakeBrd
    }

    pub fn last() -> Stage {
        Stage::Deployment
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Stage> {
        Stage::all().get(self.index() + 1).copied()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::IntakeBrd => "intake-brd",
            Stage::Design => "design",
            Stage::CodingTracker => "coding-tracker",
            Stage::BuildGates => "build-gates",
            Stage::TestSuite => "test-suite",
            Stage::TestExecution => "test-execution",
            Stage::Training => "training",
            Stage::Deployment => "deployment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::IntakeBrd => "Intake & BRD",
            Stage::Design => "Design",
            Stage::CodingTracker => "Coding Tracker",
            Stage::BuildGates => "Build Gates",
            Stage::TestSuite => "Test Suite",
            Stage::TestExecution => "Test Execution",
            Stage::Training => "Training",
            Stage::Deployment => "Deployment",
        }
    }

    /// Status a stage is left in once its advance action fires.
    pub fn terminal_status(self) -> StageStatus {
        match self {
            Stage::CodingTracker => StageStatus::Ready,
            Stage::Training | Stage::Deployment => StageStatus::Completed,
            _ => StageStatus::Approved,
        }
    }

    /// Status a stage takes when the pipeline moves onto it.
    pub fn entry_status(self) -> StageStatus {
        match self {
            Stage::Training | Stage::Deployment => StageStatus::Ready,
            _ => StageStatus::InReview,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "intake-brd" | "intake" | "brd" => Ok(Stage::IntakeBrd),
            "design" => Ok(Stage::Design),
            "coding-tracker" | "coding" => Ok(Stage::CodingTracker),
            "build-gates" | "gates" => Ok(Stage::BuildGates),
            "test-suite" | "suite" => Ok(Stage::TestSuite),
            "test-execution" | "execution" => Ok(Stage::TestExecution),
            "training" => Ok(Stage::Training),
            "deployment" => Ok(Stage::Deployment),
            _ => Err(crate::error::TrackerError::InvalidStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StageStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Draft,
    InReview,
    Approved,
    Ready,
    Completed,
}

impl StageStatus {
    pub fn all() -> &'static [StageStatus] {
        &[
            StageStatus::Draft,
            StageStatus::InReview,
            StageStatus::Approved,
            StageStatus::Ready,
            StageStatus::Completed,
        ]
    }

    /// Position along a stage's lifecycle. Writes never lower it.
    pub fn rank(self) -> u8 {
        match self {
            StageStatus::Draft => 0,
            StageStatus::InReview => 1,
            StageStatus::Ready => 2,
            StageStatus::Approved => 3,
            StageStatus::Completed => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Draft => "Draft",
            StageStatus::InReview => "In Review",
            StageStatus::Approved => "Approved",
            StageStatus::Ready => "Ready",
            StageStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageStatus {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "draft" => Ok(StageStatus::Draft),
            "in review" => Ok(StageStatus::InReview),
            "approved" => Ok(StageStatus::Approved),
            "ready" => Ok(StageStatus::Ready),
            "completed" => Ok(StageStatus::Completed),
            _ => Err(crate::error::TrackerError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
