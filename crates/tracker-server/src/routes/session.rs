use axum::extract::State;
use axum::Json;
use tracker_core::nav::nav_items;
use tracker_core::session::Session;

use crate::error::AppError;
use crate::state::AppState;

/// JSON snapshot shared by every endpoint that returns the whole session.
pub(crate) fn summary(session: &Session) -> serde_json::Value {
    let p = &session.pipeline;
    serde_json::json!({
        "requirement": session.requirement(),
        "active": p.active(),
        "viewed": p.viewed(),
        "finished": p.is_finished(),
        "nav": nav_items(p),
        "gates": session.screens.gates(),
        "history": session.history,
        "last_updated": session.last_updated,
    })
}

/// GET /api/session: requirement, stage statuses, gates and action history.
pub async fn get_session(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let (session, _) = Session::load_with_config(&root)?;
        Ok::<_, tracker_core::TrackerError>(summary(&session))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
