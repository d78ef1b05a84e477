use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use tracker_core::nav::nav_items;
use tracker_core::types::Stage;

/// List the navigation panel, or switch the viewed stage when `stage` is given.
pub fn run(root: &Path, stage: Option<Stage>, json: bool) -> anyhow::Result<()> {
    let (mut session, _) = super::load(root)?;
    if let Some(stage) = stage {
        session.navigate(stage);
        session.save(root).context("failed to save session")?;
    }

    let items = nav_items(&session.pipeline);
    if json {
        return print_json(&items);
    }

    let rows = items
        .iter()
        .map(|i| {
            let marker = match (i.highlighted, i.current) {
                (true, true) => ">*",
                (true, false) => "> ",
                (false, true) => " *",
                (false, false) => "  ",
            };
            vec![
                marker.to_string(),
                i.id.to_string(),
                i.label.to_string(),
                i.status.to_string(),
            ]
        })
        .collect();
    print_table(&["", "ID", "STAGE", "STATUS"], rows);
    if stage.is_some_and(|s| s != session.pipeline.active()) {
        println!("\nPreviewing; the pipeline is still waiting on {}.", session.pipeline.active().label());
    }
    Ok(())
}
