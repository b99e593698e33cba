use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use shared::{error::SaveFailure, protocol::SaveResponse};
use store::BatchStore;
use tracing::{error, info};

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    store: BatchStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let store = BatchStore::new(&settings.data_dir).await.map_err(|error| {
        error!(
            data_dir = %settings.data_dir.display(),
            %error,
            "failed to prepare data directory"
        );
        error
    })?;

    let state = AppState { store };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "persistence service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/save-json", post(save_json))
        .route("/api/save-tckn", post(save_tckn))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Appends a batch of row objects to `data.json`. The batch is taken
/// verbatim: no schema validation, no deduplication.
async fn save_json(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Vec<Value>>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<SaveFailure>)> {
    let total = state.store.append_rows(batch).await.map_err(|error| {
        error!(%error, "failed to append row batch");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SaveFailure::new("Failed to save JSON file")),
        )
    })?;

    info!(total, "row batch appended");
    Ok(Json(SaveResponse {
        message: "JSON file updated successfully".to_string(),
    }))
}

/// Appends a batch of bare identifiers to `tckn.json`, each wrapped as
/// `{"identifier": n}`.
async fn save_tckn(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Vec<u64>>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<SaveFailure>)> {
    let total = state
        .store
        .append_identifiers(&batch)
        .await
        .map_err(|error| {
            error!(%error, "failed to append identifier batch");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveFailure::new("Failed to save TCKN file")),
            )
        })?;

    info!(total, "identifier batch appended");
    Ok(Json(SaveResponse {
        message: "TCKN file updated successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BatchStore::new(dir.path().join("data")).await.expect("store");
        let app = build_router(Arc::new(AppState { store }));
        (dir, app)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn save_json_appends_and_confirms() {
        let (dir, app) = test_app().await;
        let body = r#"[{"identifier":12345678901,"category":"Income Tax","price":1000.0,"taxAmount":100.0,"lastPaymentDate":"11/12/2024","total":900.0}]"#;

        let response = app
            .clone()
            .oneshot(post_json("/api/save-json", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let confirmation = body_json(response).await;
        assert_eq!(confirmation["message"], "JSON file updated successfully");

        // resubmitting the same batch duplicates it
        let response = app
            .oneshot(post_json("/api/save-json", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let raw = std::fs::read_to_string(dir.path().join("data").join(store::ROWS_FILE))
            .expect("persisted file");
        let records: Vec<Value> = serde_json::from_str(&raw).expect("array");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["identifier"], 12345678901u64);
    }

    #[tokio::test]
    async fn save_tckn_wraps_identifiers() {
        let (dir, app) = test_app().await;
        let response = app
            .oneshot(post_json("/api/save-tckn", "[12345678901, 0]"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let confirmation = body_json(response).await;
        assert_eq!(confirmation["message"], "TCKN file updated successfully");

        let raw = std::fs::read_to_string(dir.path().join("data").join(store::IDENTIFIERS_FILE))
            .expect("persisted file");
        let records: Vec<Value> = serde_json::from_str(&raw).expect("array");
        assert_eq!(records[0]["identifier"], 12345678901u64);
        assert_eq!(records[1]["identifier"], 0);
    }

    #[tokio::test]
    async fn unreadable_existing_file_maps_to_server_error() {
        let (dir, app) = test_app().await;
        std::fs::write(dir.path().join("data").join(store::ROWS_FILE), "{ not json")
            .expect("corrupt file");

        let response = app
            .oneshot(post_json("/api/save-json", "[]"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let failure = body_json(response).await;
        assert_eq!(failure["error"], "Failed to save JSON file");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_the_store() {
        let (dir, app) = test_app().await;
        let response = app
            .oneshot(post_json("/api/save-tckn", r#"{"identifier": 1}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!dir.path().join("data").join(store::IDENTIFIERS_FILE).exists());
    }
}
