use super::Screen;
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_GO_LIVE: &str = "Business sign-off and Deployed status required before go-live";

pub const TRAINING_LINK: &str = "https://kb.mccain.com/training/o2c-enhancement";

/// Notifications kept on the screen; older ones are dropped first.
pub const NOTIFICATION_LIMIT: usize = 50;

pub const RECIPIENTS: &[&str] = &[
    "Business Owner",
    "Functional Consultant",
    "Technical Architect",
    "Developer Team",
    "Test Team",
    "Training Team",
    "Release Owner",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    PendingWindow,
    ReadyForGoLive,
    Deployed,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeploymentStatus::PendingWindow => "Pending Window",
            DeploymentStatus::ReadyForGoLive => "Ready for Go-Live",
            DeploymentStatus::Deployed => "Deployed",
        })
    }
}

impl std::str::FromStr for DeploymentStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "pendingwindow" | "pending" => Ok(DeploymentStatus::PendingWindow),
            "readyforgolive" | "ready" => Ok(DeploymentStatus::ReadyForGoLive),
            "deployed" => Ok(DeploymentStatus::Deployed),
            _ => Err(TrackerError::InvalidInput(format!(
                "unknown deployment status '{s}' (expected pending-window, ready-for-go-live or deployed)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgements {
    pub business_sign_off: bool,
    pub training_published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentScreen {
    pub status: DeploymentStatus,
    pub release_notes: String,
    pub acknowledgements: Acknowledgements,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Default for DeploymentScreen {
    fn default() -> Self {
        Self {
            status: DeploymentStatus::ReadyForGoLive,
            release_notes: "Order-to-Cash enhancement deployed to production. New order entry \
                            screens with improved validation and workflow. See training materials \
                            for detailed user guide."
                .to_string(),
            acknowledgements: Acknowledgements {
                business_sign_off: false,
                training_published: true,
            },
            notifications: Vec::new(),
        }
    }
}

impl DeploymentScreen {
    pub fn set_status(&mut self, status: DeploymentStatus) {
        self.status = status;
    }

    pub fn set_release_notes(&mut self, notes: &str) {
        self.release_notes = notes.to_string();
    }

    pub fn sign_off(&mut self, signed: bool) {
        self.acknowledgements.business_sign_off = signed;
    }

    /// Body of the stakeholder notification.
    pub fn message_preview(&self, requirement_id: &str) -> String {
        format!(
            "The following requirement has been deployed: {requirement_id}\n\n\
             Release Notes:\n{}\n\n\
             Training Materials: {TRAINING_LINK}\n",
            self.release_notes
        )
    }

    /// Record a notification sent to the fixed recipient list.
    pub fn notify(&mut self, requirement_id: &str) -> &Notification {
        let n = Notification {
            recipients: RECIPIENTS.iter().map(|s| s.to_string()).collect(),
            message: self.message_preview(requirement_id),
            sent_at: Utc::now(),
        };
        tracing::info!(requirement = requirement_id, recipients = n.recipients.len(), "stakeholders notified");
        self.notifications.push(n);
        if self.notifications.len() > NOTIFICATION_LIMIT {
            self.notifications.drain(..self.notifications.len() - NOTIFICATION_LIMIT);
        }
        let last = self.notifications.len() - 1;
        &self.notifications[last]
    }
}

impl Screen for DeploymentScreen {
    fn stage(&self) -> Stage {
        Stage::Deployment
    }

    fn advance_action(&self) -> &'static str {
        "Go Live"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if self.status != DeploymentStatus::Deployed || !self.acknowledgements.business_sign_off {
            return Err(MSG_GO_LIVE);
        }
        Ok(())
    }
}
