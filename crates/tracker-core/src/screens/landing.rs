use crate::catalog::{self, PendingApproval, RecentProject};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PendingCount {
    pub phase: &'static str,
    pub count: usize,
}

/// The landing page: approvals waiting on the user and recently touched projects.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub pending: Vec<PendingCount>,
    pub approvals: Vec<PendingApproval>,
    pub projects: Vec<RecentProject>,
}

impl Dashboard {
    pub fn load() -> Self {
        let approvals = catalog::pending_approvals();
        let mut pending: Vec<PendingCount> = Vec::new();
        for a in &approvals {
            match pending.iter_mut().find(|p| p.phase == a.phase) {
                Some(p) => p.count += 1,
                None => pending.push(PendingCount {
                    phase: a.phase,
                    count: 1,
                }),
            }
        }
        Self {
            pending,
            approvals,
            projects: catalog::recent_projects(),
        }
    }

    /// Keep only records whose title, phase or assignee contains `query`.
    pub fn search(mut self, query: &str) -> Self {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self;
        }
        let hit = |s: &str| s.to_lowercase().contains(&q);
        self.approvals
            .retain(|a| hit(a.title) || hit(a.phase) || hit(a.assignee));
        self.projects.retain(|p| hit(p.title) || hit(p.phase));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_counts_group_by_phase() {
        let d = Dashboard::load();
        assert_eq!(d.pending.len(), 2);
        assert_eq!(d.pending[0].phase, "BRD");
        assert_eq!(d.pending[0].count, 1);
    }

    #[test]
    fn search_matches_title_and_assignee() {
        let d = Dashboard::load().search("sarah");
        assert_eq!(d.approvals.len(), 1);
        assert_eq!(d.approvals[0].title, "P2P Automation");
        assert!(d.projects.is_empty());

        let d = Dashboard::load().search("o2c");
        assert_eq!(d.approvals.len(), 1);
        assert_eq!(d.projects.len(), 1);
    }

    #[test]
    fn empty_search_keeps_everything() {
        let d = Dashboard::load().search("  ");
        assert_eq!(d.projects.len(), 5);
    }
}
