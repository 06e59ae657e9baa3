use axum_test::TestServer;
use chrono::Utc;
use leadhub::{
    api_router,
    db::{models::Lead, repositories::lead_repository::LeadRepository},
    dto::{ApiResponse, GenerateLeadsData, LeadPageResponse, LeadResponse},
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

fn lead(first: &str, last: &str, company: &str) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        title: "VP Sales".to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        company_name: company.to_string(),
        source: "Apollo".to_string(),
        status: "new".to_string(),
        score: Some(50),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn seed_leads(pool: &SqlitePool, leads: &[Lead]) {
    let repo = LeadRepository::new(pool.clone());
    for lead in leads {
        repo.create(lead).await.expect("Failed to seed lead");
    }
}

#[tokio::test]
async fn test_list_leads_pages_and_sorts() {
    let (server, pool) = setup_test_environment().await;
    seed_leads(
        &pool,
        &[
            lead("Ada", "Lovelace", "Analytical Engines"),
            lead("Grace", "Hopper", "Navy Systems"),
            lead("Edsger", "Dijkstra", "THE Multiprogramming"),
        ],
    )
    .await;

    let page = server
        .get("/leads")
        .add_query_param("sort_by", "first_name")
        .add_query_param("sort_order", "asc")
        .await
        .json::<LeadPageResponse>();
    assert!(page.success);
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.data[0].first_name, "Ada");
    assert_eq!(page.data[2].first_name, "Grace");

    let page = server
        .get("/leads")
        .add_query_param("page", "2")
        .add_query_param("limit", "2")
        .add_query_param("sort_by", "first_name")
        .add_query_param("sort_order", "asc")
        .await
        .json::<LeadPageResponse>();
    assert_eq!(page.page, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].first_name, "Grace");
}

#[tokio::test]
async fn test_list_leads_rejects_unknown_sort_column() {
    let (server, _pool) = setup_test_environment().await;

    let response = server
        .get("/leads")
        .add_query_param("sort_by", "password; DROP TABLE leads")
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_matches_company_name() {
    let (server, pool) = setup_test_environment().await;
    seed_leads(
        &pool,
        &[
            lead("Ada", "Lovelace", "Analytical Engines"),
            lead("Grace", "Hopper", "Navy Systems"),
        ],
    )
    .await;

    let page = server
        .get("/leads/search")
        .add_query_param("q", "Navy")
        .await
        .json::<LeadPageResponse>();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].last_name, "Hopper");
}

#[tokio::test]
async fn test_update_lead_validates_status_and_score() {
    let (server, pool) = setup_test_environment().await;
    let seeded = lead("Ada", "Lovelace", "Analytical Engines");
    seed_leads(&pool, std::slice::from_ref(&seeded)).await;

    let response = server
        .put(&format!("/leads/{}", seeded.id))
        .json(&json!({ "status": "on-fire" }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let response = server
        .put(&format!("/leads/{}", seeded.id))
        .json(&json!({ "score": 150 }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let response = server
        .put(&format!("/leads/{}", seeded.id))
        .json(&json!({ "status": "qualified", "score": 90 }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    let updated = response.json::<ApiResponse<LeadResponse>>().data;
    assert_eq!(updated.status, "qualified");
    assert_eq!(updated.score, Some(90));
}

#[tokio::test]
async fn test_delete_lead_then_404() {
    let (server, pool) = setup_test_environment().await;
    let seeded = lead("Ada", "Lovelace", "Analytical Engines");
    seed_leads(&pool, std::slice::from_ref(&seeded)).await;

    let response = server.delete(&format!("/leads/{}", seeded.id)).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);

    let response = server.get(&format!("/leads/{}", seeded.id)).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::NOT_FOUND);

    let response = server.delete(&format!("/leads/{}", seeded.id)).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_produces_csv_with_quoting() {
    let (server, pool) = setup_test_environment().await;
    seed_leads(&pool, &[lead("Ada", "Lovelace", "Engines, Analytical")]).await;

    let response = server.get("/leads/export").await;
    assert_eq!(response.status_code(), axum::http::StatusCode::OK);
    assert_eq!(response.header("content-type").to_str().unwrap(), "text/csv");

    let body = response.text();
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,first_name,last_name,title,email,company_name,source,status,score,created_at"
    );
    let row = lines.next().expect("one data row");
    assert!(row.contains("Ada"));
    assert!(row.contains("\"Engines, Analytical\""));
}

#[tokio::test]
async fn test_generate_validates_request_and_returns_job_id() {
    let (server, _pool) = setup_test_environment().await;

    let response = server.post("/leads/generate").json(&json!({})).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        json!("At least one data source must be specified")
    );

    let response = server
        .post("/leads/generate")
        .json(&json!({ "sources": ["Apollo"] }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Search criteria must be provided"));

    let response = server
        .post("/leads/generate")
        .json(&json!({
            "sources": ["Apollo"],
            "criteria": { "industry": "software" }
        }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::ACCEPTED);
    let body = response.json::<ApiResponse<GenerateLeadsData>>();
    assert!(body.success);
    assert!(!body.data.job_id.is_nil());
    assert_eq!(
        body.data.message,
        "Lead generation process started successfully"
    );
}
