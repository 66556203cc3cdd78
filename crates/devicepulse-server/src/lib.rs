//! HTTP log API for devicepulse.
//!
//! Serves the two append-only telemetry tables as JSON over HTTP. Create
//! payloads are validated against the entity schema before deserialization;
//! a schema violation is a 400 carrying `{message, field}` and persists
//! nothing. There is no update or delete surface.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};

use devicepulse_core::{
    BATTERY_LOG_SCHEMA, BatteryLog, DIAGNOSTIC_SCHEMA, DiagnosticResult, NewBatteryLog,
    NewDiagnostic, StoreError, TelemetryStore, ValidationError,
};

/// Shared server state.
struct AppState {
    store: TelemetryStore,
}

/// Failure surfaced by a handler.
enum ApiError {
    /// Client-input fault: 400 with `{message, field}`.
    Validation(ValidationError),
    /// Store fault: 500, nothing was persisted partially.
    Store(StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, Json(err)).into_response(),
            Self::Store(err) => {
                log::error!("store fault: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"message": err.to_string()})),
                )
                    .into_response()
            }
        }
    }
}

/// Validate a raw body against `schema`, then deserialize it as `T`.
fn decode<T: serde::de::DeserializeOwned>(
    schema: &devicepulse_core::Schema,
    body: serde_json::Value,
) -> Result<T, ValidationError> {
    schema.validate(&body)?;
    serde_json::from_value(body).map_err(|e| ValidationError::new("", e.to_string()))
}

async fn list_diagnostics(State(state): State<Arc<AppState>>) -> Json<Vec<DiagnosticResult>> {
    Json(state.store.list_diagnostics().await)
}

async fn create_diagnostic(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<DiagnosticResult>), ApiError> {
    let input: NewDiagnostic = decode(&DIAGNOSTIC_SCHEMA, body)?;
    let record = state.store.create_diagnostic(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_battery_logs(State(state): State<Arc<AppState>>) -> Json<Vec<BatteryLog>> {
    Json(state.store.list_battery_logs().await)
}

async fn create_battery_log(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<BatteryLog>), ApiError> {
    let input: NewBatteryLog = decode(&BATTERY_LOG_SCHEMA, body)?;
    let record = state.store.create_battery_log(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let (diagnostics, battery_logs) = state.store.counts().await;
    Json(serde_json::json!({
        "status": "ok",
        "diagnostics": diagnostics,
        "batteryLogs": battery_logs,
    }))
}

/// Build the axum router.
pub fn build_router(store: TelemetryStore) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/api/diagnostics", get(list_diagnostics).post(create_diagnostic))
        .route(
            "/api/battery-logs",
            get(list_battery_logs).post(create_battery_log),
        )
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Seed the store if empty and serve the log API on an existing listener.
pub async fn serve(
    listener: tokio::net::TcpListener,
    store: TelemetryStore,
) -> std::io::Result<()> {
    store.seed().await.map_err(std::io::Error::other)?;
    let app = build_router(store);
    log::info!("log API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

/// Bind and run the log API server.
pub async fn run_server(store: TelemetryStore, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    serve(listener, store).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(TelemetryStore::in_memory())
    }

    async fn seeded_app() -> Router {
        let store = TelemetryStore::in_memory();
        store.seed().await.unwrap();
        build_router(store)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_diagnostics_starts_empty() {
        let app = app();
        let (status, body) = get_json(&app, "/api/diagnostics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_diagnostic_returns_201_with_full_record() {
        let app = app();
        let (status, body) = post_json(
            &app,
            "/api/diagnostics",
            json!({"toolName": "Speaker Test", "status": "pass"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["toolName"], "Speaker Test");
        assert_eq!(body["status"], "pass");
        assert!(body["details"].is_null());
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn create_is_visible_to_a_subsequent_list() {
        let app = app();
        post_json(&app, "/api/diagnostics", json!({"toolName": "Mic", "status": "fail"})).await;
        let (_, body) = get_json(&app, "/api/diagnostics").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["toolName"], "Mic");
    }

    #[tokio::test]
    async fn invalid_diagnostic_is_rejected_and_not_persisted() {
        let app = app();
        let (status, body) = post_json(&app, "/api/diagnostics", json!({"status": "pass"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "toolName");
        assert!(body["message"].is_string());

        let (_, listed) = get_json(&app, "/api/diagnostics").await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn status_outside_enum_is_rejected() {
        let app = app();
        let (status, body) = post_json(
            &app,
            "/api/diagnostics",
            json!({"toolName": "Camera", "status": "broken"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "status");
    }

    #[tokio::test]
    async fn battery_log_charging_defaults_to_false() {
        let app = app();
        let (status, body) =
            post_json(&app, "/api/battery-logs", json!({"level": "84"})).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["level"], "84");
        assert_eq!(body["isCharging"], false);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn battery_level_range_is_not_enforced() {
        // Known schema gap: 0-100 is convention only.
        let app = app();
        let (status, _) = post_json(&app, "/api/battery-logs", json!({"level": "150"})).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn seeded_battery_logs_list_in_timestamp_order() {
        let app = seeded_app().await;
        let (status, body) = get_json(&app, "/api/battery-logs").await;
        assert_eq!(status, StatusCode::OK);
        let levels: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["level"].as_str().unwrap())
            .collect();
        assert_eq!(levels, ["85", "84", "82", "80"]);
    }

    #[tokio::test]
    async fn fifth_record_gets_id_five() {
        let app = seeded_app().await;
        for tool in ["Vibration", "Camera", "Microphone"] {
            post_json(&app, "/api/diagnostics", json!({"toolName": tool, "status": "pass"})).await;
        }
        let (status, body) = post_json(
            &app,
            "/api/diagnostics",
            json!({"toolName": "Speaker Test", "status": "pass"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
    }

    #[tokio::test]
    async fn health_reports_table_counts() {
        let app = seeded_app().await;
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["diagnostics"], 1);
        assert_eq!(body["batteryLogs"], 4);
    }
}
