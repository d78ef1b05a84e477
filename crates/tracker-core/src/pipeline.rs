use crate::error::{Result, TrackerError};
use crate::requirement::Requirement;
use crate::types::{Stage, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Record of one forward move of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Stage,
    pub from_status: StageStatus,
    /// `None` when the final stage was closed.
    pub to: Option<Stage>,
    pub to_status: Option<StageStatus>,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The approval-gate pipeline for one requirement.
///
/// `active` only ever moves forward, one stage per `advance`. `viewed` is the
/// stage the navigation panel currently shows and may point anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub requirement: Requirement,
    active: Stage,
    viewed: Stage,
    statuses: BTreeMap<Stage, StageStatus>,
}

impl Pipeline {
    /// Start a pipeline on the first stage with every status seeded to Draft.
    pub fn start(requirement: Requirement) -> Self {
        let statuses = Stage::all()
            .iter()
            .map(|&s| (s, StageStatus::Draft))
            .collect();
        tracing::info!(requirement = %requirement.id, "pipeline started");
        Self {
            requirement,
            active: Stage::first(),
            viewed: Stage::first(),
            statuses,
        }
    }

    /// The stage the pipeline is waiting on. Stays on the last stage after
    /// go-live; use `is_finished` to tell the two apart.
    pub fn active(&self) -> Stage {
        self.active
    }

    pub fn viewed(&self) -> Stage {
        self.viewed
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        self.statuses
            .get(&stage)
            .copied()
            .unwrap_or(StageStatus::Draft)
    }

    pub fn statuses(&self) -> impl Iterator<Item = (Stage, StageStatus)> + '_ {
        Stage::all().iter().map(|&s| (s, self.status(s)))
    }

    /// True once the final stage has been closed.
    pub fn is_finished(&self) -> bool {
        self.status(Stage::last()) == StageStatus::Completed
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Fails unless `stage` is the stage the pipeline is currently waiting on.
    pub fn ensure_active(&self, stage: Stage) -> Result<()> {
        if self.is_finished() {
            return Err(TrackerError::InvalidTransition {
                from: stage.to_string(),
                to: "-".to_string(),
                reason: "pipeline is already finished".to_string(),
            });
        }
        if stage != self.active {
            return Err(TrackerError::InvalidTransition {
                from: stage.to_string(),
                to: stage.next().map(|s| s.to_string()).unwrap_or_default(),
                reason: format!("active stage is '{}'", self.active),
            });
        }
        Ok(())
    }

    /// Mark `stage` done and move the pipeline onto the following stage.
    ///
    /// Touches exactly two statuses: `stage` gets its terminal value and the
    /// next stage its entry value.
    pub fn advance(&mut self, stage: Stage) -> Result<Transition> {
        self.ensure_active(stage)?;
        let Some(next) = stage.next() else {
            return Err(TrackerError::InvalidTransition {
                from: stage.to_string(),
                to: "-".to_string(),
                reason: "final stage has no successor; close it with go-live".to_string(),
            });
        };

        let from_status = self.raise(stage, stage.terminal_status());
        let to_status = self.raise(next, next.entry_status());
        self.active = next;
        self.viewed = next;

        tracing::info!(
            requirement = %self.requirement.id,
            from = %stage,
            to = %next,
            "pipeline advanced"
        );

        Ok(Transition {
            from: stage,
            from_status,
            to: Some(next),
            to_status: Some(to_status),
            at: Utc::now(),
        })
    }

    /// Close the final stage.
    pub fn complete_final(&mut self) -> Result<Transition> {
        let last = Stage::last();
        self.ensure_active(last)?;
        let from_status = self.raise(last, last.terminal_status());
        tracing::info!(requirement = %self.requirement.id, "pipeline finished");
        Ok(Transition {
            from: last,
            from_status,
            to: None,
            to_status: None,
            at: Utc::now(),
        })
    }

    /// Switch the viewed stage. Statuses and the active stage are untouched.
    pub fn navigate(&mut self, stage: Stage) {
        tracing::debug!(to = %stage, "navigate");
        self.viewed = stage;
    }

    /// Write `status` unless it would move `stage` backwards. Returns the
    /// status the stage ends up with.
    fn raise(&mut self, stage: Stage, status: StageStatus) -> StageStatus {
        let current = self.status(stage);
        if status.rank() < current.rank() {
            tracing::warn!(%stage, %current, attempted = %status, "ignored status regression");
            return current;
        }
        self.statuses.insert(stage, status);
        status
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::start(Requirement::lookup("REQ-TEST01").unwrap())
    }

    #[test]
    fn start_seeds_draft_everywhere() {
        let p = pipeline();
        assert_eq!(p.active(), Stage::IntakeBrd);
        assert_eq!(p.viewed(), Stage::IntakeBrd);
        assert!(p.statuses().all(|(_, s)| s == StageStatus::Draft));
        assert!(!p.is_finished());
    }

    #[test]
    fn advance_touches_only_current_and_next() {
        let mut p = pipeline();
        for &stage in Stage::all() {
            if stage.is_last() {
                break;
            }
            let before: Vec<_> = p.statuses().collect();
            let t = p.advance(stage).unwrap();
            let next = stage.next().unwrap();
            assert_eq!(t.to, Some(next));
            assert_eq!(p.status(stage), stage.terminal_status());
            assert_eq!(p.status(next), next.entry_status());
            for ((s, old), (_, new)) in before.iter().zip(p.statuses()) {
                if *s != stage && *s != next {
                    assert_eq!(*old, new, "{s} should be untouched");
                }
            }
            assert_eq!(p.active(), next);
        }
    }

    #[test]
    fn full_walk_matches_transition_table() {
        let mut p = pipeline();
        for &stage in &Stage::all()[..7] {
            p.advance(stage).unwrap();
        }
        let got: Vec<_> = p.statuses().map(|(_, s)| s).collect();
        assert_eq!(
            got,
            vec![
                StageStatus::Approved,
                StageStatus::Approved,
                StageStatus::Ready,
                StageStatus::Approved,
                StageStatus::Approved,
                StageStatus::Approved,
                StageStatus::Completed,
                StageStatus::Ready,
            ]
        );
        p.complete_final().unwrap();
        assert!(p.is_finished());
        assert_eq!(p.status(Stage::Deployment), StageStatus::Completed);
    }

    #[test]
    fn advance_out_of_order_is_rejected() {
        let mut p = pipeline();
        assert!(matches!(
            p.advance(Stage::Design),
            Err(TrackerError::InvalidTransition { .. })
        ));
        p.advance(Stage::IntakeBrd).unwrap();
        // Already past intake; a second approval must not regress anything.
        assert!(p.advance(Stage::IntakeBrd).is_err());
        assert_eq!(p.active(), Stage::Design);
    }

    #[test]
    fn final_stage_cannot_advance() {
        let mut p = pipeline();
        for &stage in &Stage::all()[..7] {
            p.advance(stage).unwrap();
        }
        assert!(p.advance(Stage::Deployment).is_err());
        p.complete_final().unwrap();
        assert!(p.complete_final().is_err());
    }

    #[test]
    fn finished_pipeline_keeps_last_stage_active() {
        let mut p = pipeline();
        for &stage in &Stage::all()[..7] {
            p.advance(stage).unwrap();
        }
        p.complete_final().unwrap();
        assert!(p.is_finished());
        assert_eq!(p.active(), Stage::Deployment);
        assert!(p.ensure_active(Stage::Deployment).is_err());
        let nav = crate::nav::nav_items(&p);
        assert!(nav.iter().all(|i| !i.current));
        assert!(nav[Stage::Deployment.index()].highlighted);
    }

    #[test]
    fn complete_final_requires_deployment_active() {
        let mut p = pipeline();
        assert!(p.complete_final().is_err());
    }

    #[test]
    fn navigate_is_preview_only() {
        let mut p = pipeline();
        p.navigate(Stage::Deployment);
        assert_eq!(p.viewed(), Stage::Deployment);
        assert_eq!(p.active(), Stage::IntakeBrd);
        assert!(p.statuses().all(|(_, s)| s == StageStatus::Draft));
        assert!(p.advance(Stage::Deployment).is_err());
    }

    #[test]
    fn active_index_never_decreases() {
        let mut p = pipeline();
        let mut last = p.active().index();
        let script = [
            Stage::IntakeBrd,
            Stage::IntakeBrd,
            Stage::Training,
            Stage::Design,
            Stage::IntakeBrd,
            Stage::CodingTracker,
        ];
        for stage in script {
            let _ = p.advance(stage);
            p.navigate(Stage::IntakeBrd);
            assert!(p.active().index() >= last);
            last = p.active().index();
        }
        assert_eq!(p.active(), Stage::BuildGates);
    }

    #[test]
    fn pipeline_yaml_roundtrip() {
        let mut p = pipeline();
        p.advance(Stage::IntakeBrd).unwrap();
        let yaml = serde_yaml::to_string(&p).unwrap();
        assert!(yaml.contains("intake-brd: approved"));
        let parsed: Pipeline = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.active(), Stage::Design);
        assert_eq!(parsed.status(Stage::Design), StageStatus::InReview);
    }
}
