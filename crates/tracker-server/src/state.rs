use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, Mutex};
use tracker_core::types::Stage;

/// Payload of the SSE `update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionEvent {
    /// `action`, `navigate`, `requirement`, `stakeholder`, or `file` for a
    /// write made outside this server.
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
}

impl SessionEvent {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            stage: None,
            action: None,
        }
    }

    pub fn action(stage: Stage, action: &'static str) -> Self {
        Self {
            kind: "action",
            stage: Some(stage),
            action: Some(action),
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<SessionEvent>,
    /// Held across every load-modify-save of the session file.
    pub session_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            root,
            event_tx: tx.clone(),
            session_lock: Arc::new(Mutex::new(())),
        };

        // Broadcast whenever session.yaml changes, whether the write came from
        // this server or from the CLI. Only spawned inside a runtime.
        if tokio::runtime::Handle::try_current().is_ok() {
            let session_file = tracker_core::paths::session_path(&state.root);
            tokio::spawn(async move {
                let mut last_mtime = None::<SystemTime>;
                loop {
                    tokio::time::sleep(Duration::from_millis(800)).await;
                    let Ok(meta) = tokio::fs::metadata(&session_file).await else {
                        continue;
                    };
                    if let Ok(mtime) = meta.modified() {
                        if last_mtime != Some(mtime) {
                            last_mtime = Some(mtime);
                            let _ = tx.send(SessionEvent::new("file"));
                        }
                    }
                }
            });
        }

        state
    }

    /// Tell SSE subscribers the session changed. No subscribers is fine.
    pub fn notify(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/tracker"));
        assert_eq!(state.root, PathBuf::from("/tmp/tracker"));
        assert_eq!(state.event_tx.receiver_count(), 0);
    }

    #[test]
    fn notify_reaches_subscribers() {
        let state = AppState::new(PathBuf::from("/tmp/tracker"));
        state.notify(SessionEvent::new("requirement"));
        let mut rx = state.event_tx.subscribe();
        state.notify(SessionEvent::action(Stage::BuildGates, "run_check"));
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.stage, Some(Stage::BuildGates));
        assert_eq!(
            serde_json::to_string(&ev).unwrap(),
            r#"{"kind":"action","stage":"build-gates","action":"run_check"}"#
        );
    }

    #[tokio::test]
    async fn clones_share_the_session_lock() {
        let state = AppState::new(PathBuf::from("/tmp/tracker"));
        let other = state.clone();
        let _guard = state.session_lock.lock().await;
        assert!(other.session_lock.try_lock().is_err());
    }
}
