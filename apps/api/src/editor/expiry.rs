//! Idle session expiry. Abandoned editors are never closed by the client, so a periodic
//! sweep closes them and removes whatever they exported.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::info;

use crate::state::AppState;

/// Closes every session idle longer than `max_idle`. Returns how many were closed.
pub async fn expire_idle_sessions(state: &AppState, max_idle: chrono::Duration) -> usize {
    let expired = state.sessions.remove_idle(Utc::now() - max_idle).await;
    for id in &expired {
        state.exporter.discard(*id).await;
    }
    if !expired.is_empty() {
        info!(
            "Expired {} idle session(s), {} still open",
            expired.len(),
            state.sessions.len().await
        );
    }
    expired.len()
}

pub fn spawn_idle_sweeper(state: AppState) -> JoinHandle<()> {
    let every = Duration::from_secs(state.config.session_sweep_secs);
    let max_idle = state.config.session_max_idle();
    tokio::spawn(async move {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            expire_idle_sessions(&state, max_idle).await;
        }
    })
}
