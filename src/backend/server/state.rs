/**
 * Application State Management
 *
 * `AppState` is the single container handed to the router. Everything in it
 * is constructed explicitly at startup; nothing lives in module-level
 * globals.
 *
 * The `FromRef` implementations let handlers extract only the part they need,
 * e.g. `State(hub): State<SyncHub>`.
 */

use axum::extract::FromRef;

use crate::backend::realtime::SyncHub;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Realtime hub; owns the gateway and the broadcast channel
    pub hub: SyncHub,
}

impl AppState {
    /// Wrap a hub
    pub fn new(hub: SyncHub) -> Self {
        Self { hub }
    }
}

impl FromRef<AppState> for SyncHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
