use super::Screen;
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_NONE_READY: &str = "At least one task must be Ready for Gates";

// ---------------------------------------------------------------------------
// TaskTag / TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskTag {
    Ui5,
    Abap,
    Api,
    Config,
}

impl TaskTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskTag::Ui5 => "ui5",
            TaskTag::Abap => "abap",
            TaskTag::Api => "api",
            TaskTag::Config => "config",
        }
    }

    /// Owning team for work of this kind.
    pub fn team(self) -> &'static str {
        match self {
            TaskTag::Ui5 => "UI5 Frontend",
            TaskTag::Abap => "ABAP Backend",
            TaskTag::Api => "Integration/APIs",
            TaskTag::Config => "Config/IMG",
        }
    }
}

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskTag {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ui5" => Ok(TaskTag::Ui5),
            "abap" => Ok(TaskTag::Abap),
            "api" => Ok(TaskTag::Api),
            "config" => Ok(TaskTag::Config),
            _ => Err(TrackerError::InvalidInput(format!(
                "unknown task tag '{s}' (expected ui5, abap, api or config)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    GenerationQueued,
    Generated,
    Refined,
    ReadyForGates,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::GenerationQueued => "Generation queued",
            TaskStatus::Generated => "Generated",
            TaskStatus::Refined => "Refined",
            TaskStatus::ReadyForGates => "Ready for Gates",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "generationqueued" | "queued" => Ok(TaskStatus::GenerationQueued),
            "generated" => Ok(TaskStatus::Generated),
            "refined" => Ok(TaskStatus::Refined),
            "readyforgates" | "ready" => Ok(TaskStatus::ReadyForGates),
            _ => Err(TrackerError::InvalidInput(format!("unknown task status '{s}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// CodingScreen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub tag: TaskTag,
    pub team: String,
    pub assignee: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub last_updated: String,
}

fn task(
    id: &str,
    title: &str,
    tag: TaskTag,
    assignee: &str,
    status: TaskStatus,
    due: &str,
    updated: &str,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        tag,
        team: tag.team().to_string(),
        assignee: assignee.to_string(),
        status,
        due_date: due.to_string(),
        last_updated: updated.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingScreen {
    pub tasks: Vec<Task>,
}

impl Default for CodingScreen {
    fn default() -> Self {
        use TaskStatus::*;
        use TaskTag::*;
        Self {
            tasks: vec![
                task("1", "Order Entry UI Component", Ui5, "Jane Smith", Refined, "2025-12-18", "2 hours ago"),
                task("2", "Order Processing ABAP Function", Abap, "John Doe", Generated, "2025-12-20", "5 hours ago"),
                task("3", "Customer Search API", Api, "Mike Johnson", ReadyForGates, "2025-12-17", "1 day ago"),
                task("4", "Order Type Configuration", Config, "Sarah Lee", GenerationQueued, "2025-12-22", "3 hours ago"),
            ],
        }
    }
}

impl CodingScreen {
    pub fn task(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TrackerError::TaskNotFound(id.to_string()))
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TrackerError::TaskNotFound(id.to_string()))?;
        task.status = status;
        task.last_updated = "just now".to_string();
        Ok(task)
    }

    /// Append a queued task. The team follows from the tag.
    pub fn add_task(&mut self, title: &str, tag: TaskTag, assignee: &str, due_date: &str) -> Result<&Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::InvalidInput("task title is required".to_string()));
        }
        let next = self
            .tasks
            .iter()
            .filter_map(|t| t.id.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        self.tasks.push(task(
            &next.to_string(),
            title,
            tag,
            assignee,
            TaskStatus::GenerationQueued,
            due_date,
            "just now",
        ));
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    pub fn ready_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::ReadyForGates)
            .count()
    }
}

impl Screen for CodingScreen {
    fn stage(&self) -> Stage {
        Stage::CodingTracker
    }

    fn advance_action(&self) -> &'static str {
        "Ready for Gates"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if self.ready_count() == 0 {
            return Err(MSG_NONE_READY);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_tasks_open_the_gate() {
        let s = CodingScreen::default();
        assert_eq!(s.tasks.len(), 4);
        assert_eq!(s.task("3").unwrap().status, TaskStatus::ReadyForGates);
        assert_eq!(s.task("2").unwrap().team, "ABAP Backend");
        assert!(s.gate().open);
    }

    #[test]
    fn gate_closes_when_no_task_is_ready() {
        let mut s = CodingScreen::default();
        s.set_status("3", TaskStatus::Refined).unwrap();
        let gate = s.gate();
        assert!(!gate.open);
        assert_eq!(gate.reason, Some(MSG_NONE_READY));
        s.set_status("4", TaskStatus::ReadyForGates).unwrap();
        assert!(s.gate().open);
    }

    #[test]
    fn unknown_task_is_not_found() {
        let mut s = CodingScreen::default();
        let err = s.set_status("99", TaskStatus::Generated).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn add_task_takes_next_id_and_team() {
        let mut s = CodingScreen::default();
        let t = s.add_task("Pricing BAdI", TaskTag::Abap, "John Doe", "2025-12-30").unwrap();
        assert_eq!(t.id, "5");
        assert_eq!(t.team, "ABAP Backend");
        assert_eq!(t.status, TaskStatus::GenerationQueued);
        assert!(s.add_task("  ", TaskTag::Api, "x", "").is_err());
    }

    #[test]
    fn status_parses_labels() {
        assert_eq!("Ready for Gates".parse::<TaskStatus>().unwrap(), TaskStatus::ReadyForGates);
        assert_eq!("generation-queued".parse::<TaskStatus>().unwrap(), TaskStatus::GenerationQueued);
        assert!("done".parse::<TaskStatus>().is_err());
    }
}
