use axum::extract::State;
use axum::Json;
use tracker_core::config::Config;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: read-only view of `.tracker/config.yaml` plus its
/// validation warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let warnings = config.validate();
        Ok::<_, tracker_core::TrackerError>(serde_json::json!({
            "config": config,
            "warnings": warnings,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
