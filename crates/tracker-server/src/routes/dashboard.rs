use axum::extract::Query;
use axum::Json;
use tracker_core::screens::landing::Dashboard;

#[derive(serde::Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/dashboard?q=: pending approvals and recent projects.
pub async fn get_dashboard(Query(query): Query<DashboardQuery>) -> Json<Dashboard> {
    let dashboard = Dashboard::load();
    Json(match query.q.as_deref() {
        Some(q) => dashboard.search(q),
        None => dashboard,
    })
}
