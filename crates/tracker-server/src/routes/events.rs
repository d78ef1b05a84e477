use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

/// GET /api/events: one `update` event per session change, carrying a
/// `SessionEvent` as JSON. Lagging subscribers skip the events they missed.
pub async fn sse_events(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let stream = BroadcastStream::new(app.event_tx.subscribe()).filter_map(|msg| {
        let event = msg.ok()?;
        match Event::default().event("update").json_data(&event) {
            Ok(sse) => Some(Ok::<Event, Infallible>(sse)),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unserializable session event");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
