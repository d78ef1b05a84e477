use axum::extract::{Path, State};
use axum::Json;
use tracker_core::action::Action;
use tracker_core::session::Session;
use tracker_core::types::Stage;

use crate::error::AppError;
use crate::state::{AppState, SessionEvent};

/// GET /api/screens/:stage: one screen's state, status and advance gate.
pub async fn get_screen(
    State(app): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stage: Stage = stage.parse()?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let (session, _) = Session::load_with_config(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::json!({
            "stage": stage,
            "label": stage.label(),
            "status": session.pipeline.status(stage),
            "gate": session.screens.get(stage).gate(),
            "state": session.screens.to_json(stage)?,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/screens/:stage/actions: apply one tagged action, e.g.
/// `{"action": "run_check", "id": 1}`. A rejected action writes nothing.
pub async fn apply_action(
    State(app): State<AppState>,
    Path(stage): Path<String>,
    Json(action): Json<Action>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stage: Stage = stage.parse()?;
    if action.stage() != stage {
        return Err(AppError::bad_request(format!(
            "action '{}' belongs to {}, not {}",
            action.name(),
            action.stage(),
            stage
        )));
    }

    let name = action.name();
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let (mut session, _) = Session::load_with_config(&root)?;
        let outcome = session.apply(action)?;
        session.save(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::json!({
            "outcome": outcome,
            "session": super::session::summary(&session),
        }))
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent::action(stage, name));

    Ok(Json(result))
}
