pub mod api;
pub mod connectors;
pub mod credentials;
pub mod db;
pub mod dto;
pub mod errors;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use crate::services::{
    integration_service::{IntegrationService, RegistryOptions},
    lead_service::LeadService,
    setup_service::SetupService,
};

/// Shared application state.
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub integration_service: Arc<IntegrationService>,
    pub setup_service: Arc<SetupService>,
    pub lead_service: Arc<LeadService>,
}

/// Builds the management API router. The router is mount-point agnostic;
/// the binary nests it under `/api`, tests mount it at the root.
pub fn api_router(pool: SqlitePool) -> Router {
    api_router_with_options(pool, RegistryOptions::default())
}

pub fn api_router_with_options(pool: SqlitePool, options: RegistryOptions) -> Router {
    let integration_service = Arc::new(IntegrationService::new(pool.clone(), options));
    let setup_service = Arc::new(SetupService::new(pool.clone(), integration_service.clone()));
    let lead_service = Arc::new(LeadService::new(pool.clone()));

    let app_state = AppState {
        db_pool: pool,
        integration_service,
        setup_service,
        lead_service,
    };

    Router::new()
        .nest(
            "/integrations",
            api::routes::integration_routes::integration_routes(),
        )
        .nest("/setup", api::routes::setup_routes::setup_routes())
        .nest("/leads", api::routes::lead_routes::lead_routes())
        .route("/health", axum::routing::get(|| async { "Working!" }))
        .with_state(app_state)
}
