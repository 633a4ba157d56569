use axum::{
    Json,
    extract::{Path as AxumPath, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use twenty48_engine::{Move, SessionError, SessionId, Snapshot};

use crate::app::AppState;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    session_id: SessionId,
    direction: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    session_id: SessionId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewGameResponse {
    session_id: SessionId,
    #[serde(flatten)]
    state: Snapshot,
}

#[derive(Serialize)]
pub(crate) struct MoveResponse {
    moved: bool,
    #[serde(flatten)]
    state: Snapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthResponse {
    status: String,
    sessions: usize,
    max_sessions: usize,
}

pub async fn new_game(State(state): State<AppState>) -> Result<Json<NewGameResponse>, ApiError> {
    let (session_id, snapshot) = state.sessions.create().map_err(session_error)?;
    Ok(Json(NewGameResponse {
        session_id,
        state: snapshot,
    }))
}

pub async fn make_move(
    State(state): State<AppState>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_json)?;
    let direction: Move = req.direction.parse().map_err(|err| {
        warn!(session = %req.session_id, "rejected move: {err}");
        (StatusCode::BAD_REQUEST, format!("{err}"))
    })?;
    let (moved, snapshot) = state
        .sessions
        .with_game(&req.session_id, |game| {
            (game.make_move(direction), game.snapshot())
        })
        .map_err(session_error)?;
    debug!(session = %req.session_id, %direction, moved, score = snapshot.score, "move");
    Ok(Json(MoveResponse {
        moved,
        state: snapshot,
    }))
}

pub async fn reset_game(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<Snapshot>, ApiError> {
    let Json(req) = payload.map_err(invalid_json)?;
    let snapshot = state
        .sessions
        .reset(&req.session_id)
        .map_err(session_error)?;
    Ok(Json(snapshot))
}

pub async fn get_game(
    State(state): State<AppState>,
    AxumPath(session_id): AxumPath<String>,
) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = state
        .sessions
        .with_game(&SessionId::from(session_id), |game| game.snapshot())
        .map_err(session_error)?;
    Ok(Json(snapshot))
}

pub async fn delete_game(
    State(state): State<AppState>,
    AxumPath(session_id): AxumPath<String>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(&SessionId::from(session_id))
        .map_err(session_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.len(),
        max_sessions: state.sessions.max_sessions(),
    })
}

fn invalid_json(rejection: JsonRejection) -> ApiError {
    warn!("rejected request body: {rejection}");
    (StatusCode::BAD_REQUEST, "Invalid JSON".to_string())
}

fn session_error(err: SessionError) -> ApiError {
    match &err {
        SessionError::NotFound(id) => {
            warn!(session = %id, "unknown session");
            (StatusCode::NOT_FOUND, "Game session not found".to_string())
        }
        SessionError::Full(_) => {
            warn!("{err}");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use crate::config::Sessions;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(max_sessions: usize) -> Router {
        router(AppState::from_config(&Sessions {
            max_sessions,
            seed: Some(2048),
        }))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn new_session(app: &Router) -> (String, Value) {
        let (status, body) = send(app, "POST", "/api/game/new", None).await;
        assert_eq!(status, StatusCode::OK);
        (body["sessionId"].as_str().unwrap().to_string(), body)
    }

    #[tokio::test]
    async fn new_game_returns_two_tiles() {
        let app = app(4);
        let (id, body) = new_session(&app).await;
        assert_eq!(id.len(), 32);
        assert_eq!(body["score"], 0);
        assert_eq!(body["gameOver"], false);
        assert_eq!(body["gameWon"], false);
        let tiles = body["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 2);
        for (idx, tile) in tiles.iter().enumerate() {
            assert_eq!(tile["id"], idx as u64 + 1);
            assert_eq!(tile["isNew"], false);
            assert_eq!(tile["isMerged"], false);
        }
    }

    #[tokio::test]
    async fn move_reports_state() {
        let app = app(4);
        let (id, _) = new_session(&app).await;
        let mut any_moved = false;
        for dir in ["left", "up", "right", "down"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/game/move",
                Some(json!({ "sessionId": id, "direction": dir })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert!(body["moved"].is_boolean());
            assert!(body["tiles"].is_array());
            assert!(body["score"].as_u64().is_some());
            any_moved |= body["moved"].as_bool().unwrap();
        }
        // Two tiles on an otherwise empty board can always slide somewhere.
        assert!(any_moved);

        let (status, body) = send(&app, "GET", &format!("/api/game/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["tiles"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn bad_direction_and_bad_body_are_rejected() {
        let app = app(4);
        let (id, _) = new_session(&app).await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/game/move",
            Some(json!({ "sessionId": id, "direction": "sideways" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "POST", "/api/game/move", Some(json!({ "direction": "left" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, Value::String("Invalid JSON".to_string()));

        let (status, _) = send(&app, "POST", "/api/game/reset", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let app = app(4);
        let (status, body) = send(
            &app,
            "POST",
            "/api/game/move",
            Some(json!({ "sessionId": "missing", "direction": "left" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::String("Game session not found".to_string()));

        let (status, _) = send(&app, "POST", "/api/game/reset", Some(json!({ "sessionId": "missing" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/api/game/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/api/game/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reset_and_delete() {
        let app = app(4);
        let (id, _) = new_session(&app).await;
        for dir in ["left", "up", "right", "down", "left", "up"] {
            send(
                &app,
                "POST",
                "/api/game/move",
                Some(json!({ "sessionId": id, "direction": dir })),
            )
            .await;
        }
        let (status, body) = send(&app, "POST", "/api/game/reset", Some(json!({ "sessionId": id }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(body["score"], 0);
        assert_eq!(body["gameOver"], false);
        assert_eq!(body["gameWon"], false);

        let (status, _) = send(&app, "DELETE", &format!("/api/game/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/game/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_limit_and_health() {
        let app = app(1);
        new_session(&app).await;
        let (status, _) = send(&app, "POST", "/api/game/new", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "sessions": 1, "maxSessions": 1 }));
    }
}
