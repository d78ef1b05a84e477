use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("not initialized: run 'tracker init'")]
    NotInitialized,

    #[error("no active requirement: run 'tracker create' or 'tracker open'")]
    NoSession,

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid stage status: {0}")]
    InvalidStatus(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// A screen-local gate predicate is false. Carries the user-facing message.
    #[error("{0}")]
    GateBlocked(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid requirement id '{0}': expected REQ-XXXXXX")]
    InvalidRequirementId(String),

    #[error("stakeholder not found: {0}")]
    StakeholderNotFound(String),

    #[error("upload not found: {0}")]
    UploadNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("quality check not found: {0}")]
    QualityCheckNotFound(String),

    #[error("test case not found: {0}")]
    TestCaseNotFound(String),

    #[error("test run not found: {0}")]
    TestRunNotFound(String),

    #[error("defect not found: {0}")]
    DefectNotFound(String),

    #[error("training document not found: {0}")]
    DocumentNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub(crate) fn blocked(msg: impl Into<String>) -> Self {
        TrackerError::GateBlocked(msg.into())
    }

    /// True for errors that name a missing entity (maps to 404 over HTTP).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::StakeholderNotFound(_)
                | TrackerError::UploadNotFound(_)
                | TrackerError::TaskNotFound(_)
                | TrackerError::QualityCheckNotFound(_)
                | TrackerError::TestCaseNotFound(_)
                | TrackerError::TestRunNotFound(_)
                | TrackerError::DefectNotFound(_)
                | TrackerError::DocumentNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
