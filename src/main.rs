use std::str::FromStr;

use leadhub::{api_router_with_options, openapi::ApiDoc, services::integration_service::RegistryOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{info, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_DATABASE_URL: &str = "sqlite://leadhub.db";
const DEFAULT_PORT: &str = "8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting LeadHub Admin API...");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let connect_options = SqliteConnectOptions::from_str(&database_url)
        .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL {}: {}", database_url, e))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", database_url, e))?;
    info!("Connected to database at {}", database_url);

    sqlx::migrate!().run(&pool).await?;
    info!("Migrations applied.");

    let options = RegistryOptions {
        require_configured_for_enable: std::env::var("REQUIRE_CONFIGURED_FOR_ENABLE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
    };

    let app = axum::Router::new()
        .nest("/api", api_router_with_options(pool, options))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO)),
        );

    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", port, e))?;

    info!("Server is running on port {}", port);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
