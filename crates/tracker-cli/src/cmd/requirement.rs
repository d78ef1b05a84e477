use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use tracker_core::config::Config;
use tracker_core::requirement::RequirementForm;
use tracker_core::screens::Screen;
use tracker_core::session::Session;

// ---------------------------------------------------------------------------
// create / open
// ---------------------------------------------------------------------------

pub fn create(
    root: &Path,
    name: String,
    business_area: String,
    process: String,
    kpis: String,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let form = RequirementForm {
        name,
        business_area,
        process,
        kpis,
        stakeholders: Vec::new(),
    };
    let session = Session::create(form, &config)?;
    start(root, session, json)
}

pub fn open(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let session = Session::open(id, &config)?;
    start(root, session, json)
}

fn start(root: &Path, session: Session, json: bool) -> anyhow::Result<()> {
    if let Ok(previous) = Session::load(root) {
        tracing::warn!(requirement = %previous.requirement().id, "replacing previous session");
    }
    session.save(root).context("failed to save session")?;

    let req = session.requirement();
    if json {
        print_json(req)?;
    } else {
        println!("Started {} ({})", req.id, req.name);
        println!("Active stage: {}", session.pipeline.active().label());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

pub fn status(root: &Path, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let p = &session.pipeline;
    let req = session.requirement();
    let gate = session.screens.get(p.active()).gate();

    if json {
        let stages: Vec<_> = p
            .statuses()
            .map(|(stage, status)| serde_json::json!({ "stage": stage, "status": status }))
            .collect();
        return print_json(&serde_json::json!({
            "requirement": req,
            "active": p.active(),
            "viewed": p.viewed(),
            "finished": p.is_finished(),
            "stages": stages,
            "gate": gate,
            "last_updated": session.last_updated,
        }));
    }

    println!("{}  {}", req.id, req.name);
    if !req.business_area.is_empty() || !req.process.is_empty() {
        println!("Area: {}  Process: {}", req.business_area, req.process);
    }
    if !req.kpis.is_empty() {
        println!("KPIs: {}", req.kpis);
    }
    println!();

    let rows: Vec<Vec<String>> = p
        .statuses()
        .map(|(stage, status)| {
            let marker = if !p.is_finished() && stage == p.active() {
                "*"
            } else {
                ""
            };
            vec![
                marker.to_string(),
                stage.label().to_string(),
                status.to_string(),
            ]
        })
        .collect();
    print_table(&["", "STAGE", "STATUS"], rows);
    println!();

    if p.is_finished() {
        println!("Pipeline complete.");
    } else if gate.open {
        println!("Next: {} (ready)", gate.action);
    } else {
        println!(
            "Next: {} (blocked: {})",
            gate.action,
            gate.reason.unwrap_or("gate closed")
        );
    }
    Ok(())
}
