use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use twenty48_engine::SessionStore;

use crate::config::Sessions;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn from_config(cfg: &Sessions) -> Self {
        let store = match cfg.seed {
            Some(seed) => SessionStore::with_seed(seed, cfg.max_sessions),
            None => SessionStore::new(cfg.max_sessions),
        };
        Self {
            sessions: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/game/new", post(routes::new_game))
        .route("/api/game/move", post(routes::make_move))
        .route("/api/game/reset", post(routes::reset_game))
        .route(
            "/api/game/:session_id",
            get(routes::get_game).delete(routes::delete_game),
        )
        .route("/health", get(routes::get_health))
        .with_state(state)
}
