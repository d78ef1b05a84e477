use crate::output::{print_json, print_table};
use tracker_core::screens::landing::Dashboard;

pub fn run(search: Option<&str>, json: bool) -> anyhow::Result<()> {
    let dashboard = Dashboard::load();
    let dashboard = match search {
        Some(q) => dashboard.search(q),
        None => dashboard,
    };

    if json {
        return print_json(&dashboard);
    }

    let pending: Vec<String> = dashboard
        .pending
        .iter()
        .map(|p| format!("{}: {}", p.phase, p.count))
        .collect();
    println!("Pending approvals  {}", pending.join("  "));
    println!();

    if dashboard.approvals.is_empty() {
        println!("No pending approvals match.");
    } else {
        let rows = dashboard
            .approvals
            .iter()
            .map(|a| {
                vec![
                    a.phase.to_string(),
                    a.title.to_string(),
                    a.assignee.to_string(),
                    a.due_date.to_string(),
                ]
            })
            .collect();
        print_table(&["PHASE", "TITLE", "ASSIGNEE", "DUE"], rows);
    }
    println!();

    if dashboard.projects.is_empty() {
        println!("No recent projects match.");
    } else {
        let rows = dashboard
            .projects
            .iter()
            .map(|p| vec![p.title.to_string(), p.phase.to_string(), p.updated.to_string()])
            .collect();
        print_table(&["PROJECT", "PHASE", "UPDATED"], rows);
    }
    Ok(())
}
