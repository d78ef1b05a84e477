use axum::extract::{Path, State};
use axum::Json;
use tracker_core::nav::nav_items;
use tracker_core::session::Session;
use tracker_core::types::Stage;

use crate::error::AppError;
use crate::state::{AppState, SessionEvent};

/// GET /api/nav: the navigation panel.
pub async fn get_nav(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let session = Session::load(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::to_value(nav_items(&session.pipeline))?)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/nav/:stage: preview another stage. Never moves the pipeline.
pub async fn navigate(
    State(app): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stage: Stage = stage.parse()?;
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut session = Session::load(&root)?;
        session.navigate(stage);
        session.save(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::to_value(nav_items(&session.pipeline))?)
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent {
        stage: Some(stage),
        ..SessionEvent::new("navigate")
    });

    Ok(Json(result))
}
