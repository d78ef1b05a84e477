use crate::output::print_json;
use std::path::Path;
use tracker_core::types::Stage;

/// Dump one screen's state. Read-only; use `tracker nav <stage>` to switch.
pub fn run(root: &Path, stage: Stage, json: bool) -> anyhow::Result<()> {
    let (session, _) = super::load(root)?;
    let state = session.screens.to_json(stage)?;
    let gate = session.screens.get(stage).gate();
    let status = session.pipeline.status(stage);

    if json {
        return print_json(&serde_json::json!({
            "stage": stage,
            "status": status,
            "gate": gate,
            "state": state,
        }));
    }

    println!("{} [{}]", stage.label(), status);
    let gate_line = match gate.reason {
        None => "open".to_string(),
        Some(reason) => format!("closed: {reason}"),
    };
    println!("{}: {}", gate.action, gate_line);
    println!();
    print!("{}", serde_yaml::to_string(&state)?);
    Ok(())
}
