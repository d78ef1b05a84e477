//! Fixed option lists and the mock records shown on the landing dashboard.

use serde::Serialize;

pub const FUNCTION_OPTIONS: &[&str] = &[
    "POC – Coding",
    "POC – UI Design",
    "POC – Testing",
    "POC – Training",
    "POC – Release",
    "POC – Architecture",
    "POC – Data & Security",
    "Business Owner",
];

pub const TEAM_OPTIONS: &[&str] = &[
    "UI5 Frontend",
    "ABAP Backend",
    "Integration/APIs",
    "Config/IMG",
    "Testing",
    "Training",
    "Architecture",
    "Data & Security",
    "Business",
];

pub const DEPARTMENT_OPTIONS: &[&str] = &["SAP", "Non-SAP", "Cross-platform"];

pub const BUSINESS_AREA_OPTIONS: &[&str] = &["Sales", "Finance", "Operations", "Supply Chain"];

pub const PROCESS_OPTIONS: &[&str] = &["O2C", "P2P"];

pub const AUDIENCE_OPTIONS: &[&str] = &["Sales", "Operations", "IT"];

/// Resolve free-form user input against a fixed option list.
///
/// Comparison ignores case, surrounding whitespace and dash style, so
/// `poc - coding` resolves to `POC – Coding`.
pub fn match_option(options: &[&'static str], input: &str) -> Option<&'static str> {
    let wanted = normalize(input);
    options.iter().copied().find(|o| normalize(o) == wanted)
}

fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '–' | '—' | '‑' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Landing dashboard mocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PendingApproval {
    pub phase: &'static str,
    pub title: &'static str,
    pub assignee: &'static str,
    pub due_date: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentProject {
    pub title: &'static str,
    pub phase: &'static str,
    pub updated: &'static str,
}

pub fn pending_approvals() -> Vec<PendingApproval> {
    vec![
        PendingApproval {
            phase: "BRD",
            title: "O2C Enhancement",
            assignee: "John Smith",
            due_date: "2025-12-20",
        },
        PendingApproval {
            phase: "Design",
            title: "P2P Automation",
            assignee: "Sarah Jones",
            due_date: "2025-12-18",
        },
    ]
}

pub fn recent_projects() -> Vec<RecentProject> {
    vec![
        RecentProject {
            title: "O2C Enhancement",
            phase: "Design",
            updated: "2 hours ago",
        },
        RecentProject {
            title: "P2P Automation",
            phase: "Coding Tracker",
            updated: "5 hours ago",
        },
        RecentProject {
            title: "Inventory Module",
            phase: "Test Suite",
            updated: "1 day ago",
        },
        RecentProject {
            title: "Sales Dashboard",
            phase: "Training",
            updated: "2 days ago",
        },
        RecentProject {
            title: "Finance Integration",
            phase: "Deployment",
            updated: "3 days ago",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_option_ignores_case_and_dash_style() {
        assert_eq!(
            match_option(FUNCTION_OPTIONS, "poc - coding"),
            Some("POC – Coding")
        );
        assert_eq!(
            match_option(TEAM_OPTIONS, "  abap   backend "),
            Some("ABAP Backend")
        );
        assert_eq!(match_option(DEPARTMENT_OPTIONS, "non-sap"), Some("Non-SAP"));
        assert_eq!(match_option(DEPARTMENT_OPTIONS, "mainframe"), None);
    }

    #[test]
    fn dashboard_mocks_are_populated() {
        assert_eq!(pending_approvals().len(), 2);
        assert_eq!(recent_projects().len(), 5);
    }
}
