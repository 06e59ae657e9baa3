use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::credentials::CredentialMap;

/// An integration record. `integration_type` and `status` are stored as
/// TEXT and map to the DTO enums at the service boundary.
#[derive(Debug, FromRow, Clone)]
pub struct Integration {
    pub id: Uuid,
    pub name: String,
    pub integration_type: String,
    pub is_enabled: bool,
    pub is_configured: bool,
    pub credentials: Json<CredentialMap>,
    pub last_tested: Option<DateTime<Utc>>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The setup-state singleton. At most one row exists; it is lazily
/// created on first read.
#[derive(Debug, FromRow, Clone)]
pub struct SystemConfig {
    pub id: Uuid,
    pub setup_completed: bool,
    pub setup_step: i64,
    pub default_data_sources: Json<Vec<Uuid>>,
    pub default_enrichment_services: Json<Vec<Uuid>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Clone)]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub company_name: String,
    pub source: String,
    pub status: String,
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
