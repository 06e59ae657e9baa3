use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::{
    dto::{
        CompleteSetupRequest, CompleteSetupResponse, SaveStepRequest, SetupStatusResponse,
        SetupStepResponse, TestConnectionsResponse,
    },
    errors::ApiError,
    AppState,
};

pub fn setup_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(setup_status_handler))
        .route("/start", post(start_setup_handler))
        .route("/step/{step}", post(save_step_handler))
        .route("/complete", post(complete_setup_handler))
        .route("/test-connections", post(test_connections_handler))
}

#[utoipa::path(
    get,
    path = "/api/setup/status",
    responses(
        (status = 200, description = "Setup completion state", body = SetupStatusResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Setup"
)]
pub async fn setup_status_handler(
    State(app_state): State<AppState>,
) -> Result<Json<SetupStatusResponse>, ApiError> {
    let status = app_state.setup_service.status().await?;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/api/setup/start",
    responses(
        (status = 200, description = "Wizard reset to step 1, catalog seeded", body = SetupStepResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Setup"
)]
pub async fn start_setup_handler(
    State(app_state): State<AppState>,
) -> Result<Json<SetupStepResponse>, ApiError> {
    let response = app_state.setup_service.start().await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/setup/step/{step}",
    request_body = SaveStepRequest,
    params(("step" = i64, Path, description = "Wizard step number, 1 through 4")),
    responses(
        (status = 200, description = "Step progress saved", body = SetupStepResponse),
        (status = 400, description = "Step number out of range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Setup"
)]
pub async fn save_step_handler(
    State(app_state): State<AppState>,
    Path(step): Path<i64>,
    Json(payload): Json<SaveStepRequest>,
) -> Result<Json<SetupStepResponse>, ApiError> {
    let response = app_state.setup_service.save_step(step, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/setup/complete",
    request_body = CompleteSetupRequest,
    responses(
        (status = 200, description = "Setup marked complete", body = CompleteSetupResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Setup"
)]
pub async fn complete_setup_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CompleteSetupRequest>,
) -> Result<Json<CompleteSetupResponse>, ApiError> {
    let response = app_state.setup_service.complete(payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/setup/test-connections",
    responses(
        (status = 200, description = "Per-integration test results; unconfigured integrations are absent", body = TestConnectionsResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Setup"
)]
pub async fn test_connections_handler(
    State(app_state): State<AppState>,
) -> Result<Json<TestConnectionsResponse>, ApiError> {
    let results = app_state.setup_service.test_all_configured().await?;
    Ok(Json(TestConnectionsResponse {
        success: true,
        results,
    }))
}
