pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and by the integration tests.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Session
        .route("/api/session", get(routes::session::get_session))
        // Landing
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/requirements", post(routes::requirements::create_requirement))
        .route(
            "/api/requirements/open",
            post(routes::requirements::open_requirement),
        )
        .route(
            "/api/stakeholders",
            post(routes::requirements::add_stakeholder),
        )
        .route(
            "/api/stakeholders/{id}",
            delete(routes::requirements::remove_stakeholder),
        )
        // Navigation
        .route("/api/nav", get(routes::nav::get_nav))
        .route("/api/nav/{stage}", post(routes::nav::navigate))
        // Screens
        .route("/api/screens/{stage}", get(routes::screens::get_screen))
        .route(
            "/api/screens/{stage}/actions",
            post(routes::screens::apply_action),
        )
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the tracker API server on a pre-bound listener.
///
/// The caller binds first so it can read the actual port when `port = 0`.
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("tracker API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/session");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
