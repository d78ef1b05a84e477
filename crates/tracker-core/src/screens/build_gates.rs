use super::Screen;
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_CHECKS_PENDING: &str =
    "All quality gates must pass before generating the test suite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Pending,
    Pass,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Pending => "Pending",
            CheckStatus::Pass => "Pass",
            CheckStatus::Fail => "Fail",
        })
    }
}

/// One quality stage. Ids are 1-based and fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub id: u32,
    pub name: String,
    pub status: CheckStatus,
    pub button_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReview {
    pub reviewer: String,
    pub status: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedTask {
    pub id: String,
    pub task: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildGatesScreen {
    pub checks: Vec<QualityCheck>,
    pub peer_reviews: Vec<PeerReview>,
    pub imported_tasks: Vec<ImportedTask>,
}

impl Default for BuildGatesScreen {
    fn default() -> Self {
        let check = |id, name: &str, label: &str| QualityCheck {
            id,
            name: name.to_string(),
            status: CheckStatus::Pending,
            button_label: label.to_string(),
        };
        let review = |who: &str| PeerReview {
            reviewer: who.to_string(),
            status: "Pending".to_string(),
            notes: String::new(),
        };
        let imported = |id: &str, task: &str| ImportedTask {
            id: id.to_string(),
            task: task.to_string(),
            completed: false,
        };
        Self {
            checks: vec![
                check(1, "Code Quality (includes Naming Standards)", "Run Code Quality"),
                check(2, "Security Scan", "Run Security Scan"),
                check(3, "Peer Review", "Request Peer Review"),
            ],
            peer_reviews: vec![review("Tech Lead"), review("Senior Dev")],
            imported_tasks: vec![
                imported("1", "Validate UI5 controller logic"),
                imported("2", "Check ABAP function module"),
                imported("3", "Review API endpoint security"),
                imported("4", "Verify configuration settings"),
            ],
        }
    }
}

impl BuildGatesScreen {
    pub fn check(&self, id: u32) -> Result<&QualityCheck> {
        self.checks
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TrackerError::QualityCheckNotFound(id.to_string()))
    }

    /// Run a quality stage. The simulated run always passes.
    pub fn run(&mut self, id: u32) -> Result<&QualityCheck> {
        let check = self
            .checks
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TrackerError::QualityCheckNotFound(id.to_string()))?;
        if check.status == CheckStatus::Pass {
            return Err(TrackerError::GateBlocked(format!("{} has already passed", check.name)));
        }
        check.status = CheckStatus::Pass;
        tracing::debug!(check = %check.name, "quality check passed");
        Ok(check)
    }

    pub fn evidence(&self, id: u32) -> Result<Evidence> {
        let check = self.check(id)?;
        let evidence = if check.name.contains("Code Quality") {
            Evidence {
                title: "Code Quality Report",
                lines: &[
                    "✓ Linting: 0 errors, 2 warnings",
                    "✓ Code complexity: All functions below threshold",
                    "✓ Naming standards: 100% compliant",
                    "✓ Documentation: All public methods documented",
                    "⚠ Warning: Consider refactoring order validation function (complexity: 12)",
                ],
            }
        } else if check.name.contains("Security") {
            Evidence {
                title: "Security Scan Report",
                lines: &[
                    "✓ No SQL injection vulnerabilities detected",
                    "✓ No hardcoded credentials found",
                    "✓ Authorization checks present in all endpoints",
                    "✓ Input validation implemented",
                    "✓ HTTPS enforced for all API calls",
                ],
            }
        } else {
            Evidence {
                title: "Peer Review Evidence",
                lines: &[
                    "PR Link: https://git.mccain.com/sap/o2c/pull/123",
                    "Approvals: 2/2 required",
                    "",
                    "Tech Lead: \"Approved - architecture looks solid\"",
                    "Senior Dev: \"Approved - code is clean and well-tested\"",
                ],
            }
        };
        Ok(evidence)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<&ImportedTask> {
        let task = self
            .imported_tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TrackerError::TaskNotFound(id.to_string()))?;
        task.completed = !task.completed;
        Ok(task)
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.status == CheckStatus::Pass)
    }
}

impl Screen for BuildGatesScreen {
    fn stage(&self) -> Stage {
        Stage::BuildGates
    }

    fn advance_action(&self) -> &'static str {
        "Generate Test Suite (AI)"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if !self.all_passed() {
            return Err(MSG_CHECKS_PENDING);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_opens_only_when_every_check_passes() {
        let mut s = BuildGatesScreen::default();
        assert!(!s.gate().open);
        s.run(1).unwrap();
        s.run(3).unwrap();
        assert!(!s.gate().open);
        s.run(2).unwrap();
        assert!(s.gate().open);
    }

    #[test]
    fn run_is_disabled_after_pass() {
        let mut s = BuildGatesScreen::default();
        s.run(2).unwrap();
        assert!(matches!(s.run(2), Err(TrackerError::GateBlocked(_))));
        assert!(s.run(9).unwrap_err().is_not_found());
    }

    #[test]
    fn evidence_matches_check() {
        let s = BuildGatesScreen::default();
        assert_eq!(s.evidence(1).unwrap().title, "Code Quality Report");
        assert_eq!(s.evidence(2).unwrap().lines.len(), 5);
        assert!(s.evidence(3).unwrap().lines[0].starts_with("PR Link"));
    }

    #[test]
    fn imported_tasks_toggle() {
        let mut s = BuildGatesScreen::default();
        assert!(s.toggle_task("2").unwrap().completed);
        assert!(!s.toggle_task("2").unwrap().completed);
    }
}
