use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    dto::{
        ApiResponse, GenerateLeadsData, GenerateLeadsRequest, LeadListQuery, LeadPageResponse,
        LeadResponse, LeadSearchQuery, MessageResponse, UpdateLeadRequest,
    },
    errors::ApiError,
    AppState,
};

pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leads_handler))
        .route("/search", get(search_leads_handler))
        .route("/export", get(export_leads_handler))
        .route("/generate", post(generate_leads_handler))
        .route(
            "/{id}",
            get(get_lead_handler)
                .put(update_lead_handler)
                .delete(delete_lead_handler),
        )
}

#[utoipa::path(
    get,
    path = "/api/leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "Paged leads", body = LeadPageResponse),
        (status = 400, description = "Invalid sort parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn list_leads_handler(
    State(app_state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> Result<Json<LeadPageResponse>, ApiError> {
    let page = app_state.lead_service.list_leads(&query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/leads/search",
    params(LeadSearchQuery),
    responses(
        (status = 200, description = "Leads matching the query", body = LeadPageResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn search_leads_handler(
    State(app_state): State<AppState>,
    Query(query): Query<LeadSearchQuery>,
) -> Result<Json<LeadPageResponse>, ApiError> {
    let page = app_state.lead_service.search_leads(&query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/leads/export",
    responses(
        (status = 200, description = "All leads as CSV", body = String, content_type = "text/csv"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn export_leads_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = app_state.lead_service.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        csv,
    ))
}

/// Stub endpoint: accepts the request and returns a job id, but no
/// pipeline runs behind it.
#[utoipa::path(
    post,
    path = "/api/leads/generate",
    request_body = GenerateLeadsRequest,
    responses(
        (status = 202, description = "Generation accepted", body = GenerateLeadsData),
        (status = 400, description = "Missing sources or criteria"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn generate_leads_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<GenerateLeadsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GenerateLeadsData>>), ApiError> {
    let data = app_state.lead_service.start_generation(&payload).await?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::new(data))))
}

#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead found", body = LeadResponse),
        (status = 404, description = "Lead not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn get_lead_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LeadResponse>>, ApiError> {
    let lead = app_state.lead_service.get_lead(id).await?;
    Ok(Json(ApiResponse::new(lead)))
}

#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    request_body = UpdateLeadRequest,
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead updated", body = LeadResponse),
        (status = 400, description = "Invalid status or score"),
        (status = 404, description = "Lead not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn update_lead_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<LeadResponse>>, ApiError> {
    let lead = app_state.lead_service.update_lead(id, &payload).await?;
    Ok(Json(ApiResponse::new(lead)))
}

#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead deleted", body = MessageResponse),
        (status = 404, description = "Lead not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leads"
)]
pub async fn delete_lead_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state.lead_service.delete_lead(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Lead deleted successfully".to_string(),
    }))
}
