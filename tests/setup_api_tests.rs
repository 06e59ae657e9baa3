use std::collections::HashMap;

use axum_test::TestServer;
use leadhub::{
    api_router,
    db::models::SystemConfig,
    dto::{
        ApiResponse, CompleteSetupResponse, IntegrationResponse, SetupStatusResponse,
        SetupStepResponse, TestResult,
    },
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup_test_environment() -> (TestServer, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let server = TestServer::new(api_router(pool.clone())).expect("Failed to create TestServer");
    (server, pool)
}

async fn integrations(server: &TestServer) -> Vec<IntegrationResponse> {
    server
        .get("/integrations")
        .await
        .json::<ApiResponse<Vec<IntegrationResponse>>>()
        .data
}

async fn integration_named(server: &TestServer, name: &str) -> IntegrationResponse {
    integrations(server)
        .await
        .into_iter()
        .find(|i| i.name == name)
        .unwrap_or_else(|| panic!("integration {} not seeded", name))
}

#[tokio::test]
async fn test_status_lazily_creates_singleton() {
    let (server, pool) = setup_test_environment().await;

    let status = server.get("/setup/status").await.json::<SetupStatusResponse>();
    assert!(status.success);
    assert!(!status.setup_completed);
    assert_eq!(status.setup_step, 0);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM system_config")
        .fetch_one(&pool)
        .await
        .expect("Failed to count config rows");
    assert_eq!(rows, 1);

    // A second status check reuses the row.
    server.get("/setup/status").await.json::<SetupStatusResponse>();
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM system_config")
        .fetch_one(&pool)
        .await
        .expect("Failed to count config rows");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_start_resets_state_and_seeds_catalog() {
    let (server, _pool) = setup_test_environment().await;

    let response = server.post("/setup/start").await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    let body = response.json::<SetupStepResponse>();
    assert!(body.success);
    assert_eq!(body.setup_step, 1);

    let status = server.get("/setup/status").await.json::<SetupStatusResponse>();
    assert!(!status.setup_completed);
    assert_eq!(status.setup_step, 1);

    assert_eq!(integrations(&server).await.len(), 12);
}

#[tokio::test]
async fn test_step_number_out_of_range_is_rejected() {
    let (server, _pool) = setup_test_environment().await;
    server.post("/setup/start").await;

    for step in [0, 5] {
        let response = server
            .post(&format!("/setup/step/{}", step))
            .json(&json!({}))
            .await;
        assert_eq!(
            response.status_code(),
            axum::http::StatusCode::BAD_REQUEST,
            "step {} should be rejected",
            step
        );
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], json!("Invalid step number"));
    }
}

#[tokio::test]
async fn test_step_two_persists_wizard_credentials() {
    let (server, _pool) = setup_test_environment().await;
    server.post("/setup/start").await;
    let apollo = integration_named(&server, "Apollo").await;

    let mut api_configurations = HashMap::new();
    api_configurations.insert(
        apollo.id,
        HashMap::from([("apiKey".to_string(), "wizard-key".to_string())]),
    );
    // Unknown ids are skipped, not errors.
    api_configurations.insert(
        Uuid::new_v4(),
        HashMap::from([("apiKey".to_string(), "orphan".to_string())]),
    );

    let response = server
        .post("/setup/step/2")
        .json(&json!({ "api_configurations": api_configurations }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    assert_eq!(response.json::<SetupStepResponse>().setup_step, 2);

    let apollo = integration_named(&server, "Apollo").await;
    assert!(apollo.is_configured);
    assert_eq!(apollo.credentials.get("apiKey").unwrap(), "wizard-key");

    let status = server.get("/setup/status").await.json::<SetupStatusResponse>();
    assert_eq!(status.setup_step, 2);
}

#[tokio::test]
async fn test_test_connections_covers_only_configured_integrations() {
    let (server, _pool) = setup_test_environment().await;
    server.post("/setup/start").await;

    let apollo = integration_named(&server, "Apollo").await;
    let linkedin = integration_named(&server, "LinkedIn").await;
    let crunchbase = integration_named(&server, "Crunchbase").await;

    server
        .put(&format!("/integrations/{}", apollo.id))
        .json(&json!({ "credentials": { "apiKey": "k" } }))
        .await;
    server
        .put(&format!("/integrations/{}", linkedin.id))
        .json(&json!({ "credentials": { "apiKey": "k" } }))
        .await;

    let response = server.post("/setup/test-connections").await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));

    let results: HashMap<Uuid, TestResult> =
        serde_json::from_value(body["results"].clone()).expect("results map");
    assert_eq!(results.len(), 2);
    assert!(results[&apollo.id].success);
    assert!(!results[&linkedin.id].success);
    assert!(!results.contains_key(&crunchbase.id));
}

#[tokio::test]
async fn test_complete_records_default_selections() {
    let (server, pool) = setup_test_environment().await;
    server.post("/setup/start").await;
    let apollo = integration_named(&server, "Apollo").await;
    let openai = integration_named(&server, "OpenAI").await;

    let response = server
        .post("/setup/complete")
        .json(&json!({
            "default_data_sources": [apollo.id],
            "default_enrichment_services": [openai.id]
        }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    let body = response.json::<CompleteSetupResponse>();
    assert!(body.setup_completed);

    let config = sqlx::query_as::<_, SystemConfig>(
        "SELECT id, setup_completed, setup_step, default_data_sources, \
         default_enrichment_services, created_at, updated_at FROM system_config LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to fetch config");
    assert!(config.setup_completed);
    assert_eq!(config.default_data_sources.0, vec![apollo.id]);
    assert_eq!(config.default_enrichment_services.0, vec![openai.id]);
}

#[tokio::test]
async fn test_full_wizard_flow() {
    let (server, _pool) = setup_test_environment().await;

    // start -> configure -> verify -> test -> complete
    let start = server.post("/setup/start").await.json::<SetupStepResponse>();
    assert_eq!(start.setup_step, 1);

    let apollo = integration_named(&server, "Apollo").await;
    server
        .post("/setup/step/2")
        .json(&json!({ "api_configurations": { (apollo.id.to_string()): { "apiKey": "abc" } } }))
        .await;

    let apollo = integration_named(&server, "Apollo").await;
    assert!(apollo.is_configured);

    let result = server
        .post(&format!("/integrations/{}/test", apollo.id))
        .await
        .json::<TestResult>();
    assert!(result.success);

    server
        .post("/setup/complete")
        .json(&json!({ "default_data_sources": [apollo.id] }))
        .await;

    let status = server.get("/setup/status").await.json::<SetupStatusResponse>();
    assert!(status.setup_completed);
}
