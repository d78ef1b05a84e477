use axum::extract::{Path, State};
use axum::Json;
use tracker_core::config::Config;
use tracker_core::requirement::{RequirementForm, StakeholderForm};
use tracker_core::session::Session;

use crate::error::AppError;
use crate::state::{AppState, SessionEvent};

/// POST /api/requirements: create a requirement and start a fresh session.
pub async fn create_requirement(
    State(app): State<AppState>,
    Json(form): Json<RequirementForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let session = Session::create(form, &config)?;
        session.save(&root)?;
        tracing::info!(requirement = %session.requirement().id, "requirement created");
        Ok::<_, tracker_core::TrackerError>(super::session::summary(&session))
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent::new("requirement"));

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct OpenBody {
    pub id: String,
}

/// POST /api/requirements/open: start a session for an existing requirement id.
pub async fn open_requirement(
    State(app): State<AppState>,
    Json(body): Json<OpenBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let session = Session::open(&body.id, &config)?;
        session.save(&root)?;
        Ok::<_, tracker_core::TrackerError>(super::session::summary(&session))
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent::new("requirement"));

    Ok(Json(result))
}

/// POST /api/stakeholders: add a stakeholder to the active requirement.
pub async fn add_stakeholder(
    State(app): State<AppState>,
    Json(form): Json<StakeholderForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let (mut session, _) = Session::load_with_config(&root)?;
        let added = session.add_stakeholder(form)?;
        session.save(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::to_value(added)?)
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent::new("stakeholder"));

    Ok(Json(result))
}

/// DELETE /api/stakeholders/:id
pub async fn remove_stakeholder(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.session_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut session = Session::load(&root)?;
        let removed = session.remove_stakeholder(&id)?;
        session.save(&root)?;
        Ok::<_, tracker_core::TrackerError>(serde_json::to_value(removed)?)
    })
    .await
    .map_err(AppError::join)??;
    app.notify(SessionEvent::new("stakeholder"));

    Ok(Json(result))
}
