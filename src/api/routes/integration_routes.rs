use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    dto::{
        ApiResponse, BatchUpdateRequest, BatchUpdateResponse, IntegrationResponse,
        TestResult, ToggleIntegrationRequest, UpdateIntegrationRequest,
    },
    errors::ApiError,
    AppState,
};

pub fn integration_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_integrations_handler))
        .route("/batch-update", post(batch_update_handler))
        .route(
            "/{id}",
            get(get_integration_handler).put(update_integration_handler),
        )
        .route("/{id}/test", post(test_connection_handler))
        .route("/{id}/enable", put(toggle_integration_handler))
}

#[utoipa::path(
    get,
    path = "/api/integrations",
    responses(
        (status = 200, description = "All integrations, ordered by (type, name)", body = [IntegrationResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn list_integrations_handler(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IntegrationResponse>>>, ApiError> {
    let integrations = app_state.integration_service.list_integrations().await?;
    Ok(Json(ApiResponse::new(integrations)))
}

#[utoipa::path(
    get,
    path = "/api/integrations/{id}",
    params(("id" = Uuid, Path, description = "Integration ID")),
    responses(
        (status = 200, description = "Integration found", body = IntegrationResponse),
        (status = 404, description = "Integration not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn get_integration_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IntegrationResponse>>, ApiError> {
    let integration = app_state.integration_service.get_integration(id).await?;
    Ok(Json(ApiResponse::new(integration)))
}

#[utoipa::path(
    put,
    path = "/api/integrations/{id}",
    request_body = UpdateIntegrationRequest,
    params(("id" = Uuid, Path, description = "Integration ID")),
    responses(
        (status = 200, description = "Integration updated", body = IntegrationResponse),
        (status = 404, description = "Integration not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn update_integration_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIntegrationRequest>,
) -> Result<Json<ApiResponse<IntegrationResponse>>, ApiError> {
    let integration = app_state
        .integration_service
        .update_integration(id, &payload)
        .await?;
    Ok(Json(ApiResponse::new(integration)))
}

/// A failed check is a 200 with `success: false`; only transport-level
/// problems surface as HTTP errors.
#[utoipa::path(
    post,
    path = "/api/integrations/{id}/test",
    params(("id" = Uuid, Path, description = "Integration ID")),
    responses(
        (status = 200, description = "Test outcome", body = TestResult),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn test_connection_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestResult>, ApiError> {
    let result = app_state.integration_service.test_connection(id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    put,
    path = "/api/integrations/{id}/enable",
    request_body = ToggleIntegrationRequest,
    params(("id" = Uuid, Path, description = "Integration ID")),
    responses(
        (status = 200, description = "Integration toggled", body = IntegrationResponse),
        (status = 400, description = "Strict mode: integration not configured"),
        (status = 404, description = "Integration not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn toggle_integration_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleIntegrationRequest>,
) -> Result<Json<ApiResponse<IntegrationResponse>>, ApiError> {
    let integration = app_state
        .integration_service
        .toggle_integration(id, payload.is_enabled)
        .await?;
    Ok(Json(ApiResponse::new(integration)))
}

#[utoipa::path(
    post,
    path = "/api/integrations/batch-update",
    request_body = BatchUpdateRequest,
    responses(
        (status = 200, description = "Updated integrations; entries without an id and unknown ids are omitted", body = BatchUpdateResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Integrations"
)]
pub async fn batch_update_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<BatchUpdateRequest>,
) -> Result<Json<BatchUpdateResponse>, ApiError> {
    let results = app_state
        .integration_service
        .batch_update(&payload.updates)
        .await?;
    Ok(Json(BatchUpdateResponse {
        success: true,
        count: results.len(),
        results,
    }))
}
