use crate::pipeline::Pipeline;
use crate::types::{Stage, StageStatus};
use serde::Serialize;

/// Badge colour token for a status, as the navigation panel renders it.
pub fn badge(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Draft => "gray",
        StageStatus::InReview => "warning",
        StageStatus::Approved => "success",
        StageStatus::Ready => "info",
        StageStatus::Completed => "purple",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub id: Stage,
    pub label: &'static str,
    pub status: StageStatus,
    pub badge: &'static str,
    /// The stage currently on screen.
    pub highlighted: bool,
    /// The stage the pipeline is waiting on.
    pub current: bool,
}

/// Ordered navigation entries for every stage.
pub fn nav_items(pipeline: &Pipeline) -> Vec<NavItem> {
    let finished = pipeline.is_finished();
    Stage::all()
        .iter()
        .map(|&stage| {
            let status = pipeline.status(stage);
            NavItem {
                id: stage,
                label: stage.label(),
                status,
                badge: badge(status),
                highlighted: stage == pipeline.viewed(),
                current: !finished && stage == pipeline.active(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    #[test]
    fn nav_lists_stages_in_order() {
        let p = Pipeline::start(Requirement::lookup("REQ-NAV001").unwrap());
        let items = nav_items(&p);
        assert_eq!(items.len(), 8);
        assert_eq!(items[0].label, "Intake & BRD");
        assert_eq!(items[7].label, "Deployment");
        assert!(items[0].highlighted && items[0].current);
        assert!(items[1..].iter().all(|i| !i.highlighted && !i.current));
        assert!(items.iter().all(|i| i.badge == "gray"));
    }

    #[test]
    fn highlight_follows_navigation_but_current_does_not() {
        let mut p = Pipeline::start(Requirement::lookup("REQ-NAV001").unwrap());
        p.advance(Stage::IntakeBrd).unwrap();
        p.navigate(Stage::TestSuite);
        let items = nav_items(&p);
        assert!(items[Stage::TestSuite.index()].highlighted);
        assert!(items[Stage::Design.index()].current);
        assert_eq!(items[Stage::IntakeBrd.index()].badge, "success");
        assert_eq!(items[Stage::Design.index()].badge, "warning");
    }
}
