use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::credentials::CredentialMap;

/// Category of a third-party integration.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationType {
    #[serde(rename = "leadSource")]
    LeadSource,
    #[serde(rename = "enrichment")]
    Enrichment,
    #[serde(rename = "email")]
    Email,
}

impl std::fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationType::LeadSource => write!(f, "leadSource"),
            IntegrationType::Enrichment => write!(f, "enrichment"),
            IntegrationType::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for IntegrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leadSource" => Ok(IntegrationType::LeadSource),
            "enrichment" => Ok(IntegrationType::Enrichment),
            "email" => Ok(IntegrationType::Email),
            _ => Err(format!("Unknown integration type: {}", s)),
        }
    }
}

/// Connectivity state of an integration. Transitions to `Active`/`Error`
/// happen only as the result of a connection test.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Active,
    Error,
    Unconfigured,
}

impl std::fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationStatus::Active => write!(f, "active"),
            IntegrationStatus::Error => write!(f, "error"),
            IntegrationStatus::Unconfigured => write!(f, "unconfigured"),
        }
    }
}

impl std::str::FromStr for IntegrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(IntegrationStatus::Active),
            "error" => Ok(IntegrationStatus::Error),
            "unconfigured" => Ok(IntegrationStatus::Unconfigured),
            _ => Err(format!("Unknown integration status: {}", s)),
        }
    }
}

/// Outcome of a single connection test. Returned to the caller and folded
/// into the integration's `status`/`error_message`/`last_tested` fields.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Generic success envelope: `{ "success": true, "data": ... }`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Plain acknowledgement envelope.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// --- Integration DTOs ---

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct IntegrationResponse {
    pub id: Uuid,
    pub name: String,
    pub integration_type: IntegrationType,
    pub is_enabled: bool,
    pub is_configured: bool,
    pub credentials: CredentialMap,
    pub last_tested: Option<DateTime<Utc>>,
    pub status: IntegrationStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. Credentials are shallow-merged into the stored map, not
/// replaced, and `is_configured` is recomputed after the merge.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, Default)]
pub struct UpdateIntegrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<IntegrationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ToggleIntegrationRequest {
    pub is_enabled: bool,
}

/// One entry of a batch update. Entries without an id are skipped.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct BatchUpdateEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub update: UpdateIntegrationRequest,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BatchUpdateRequest {
    pub updates: Vec<BatchUpdateEntry>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BatchUpdateResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<IntegrationResponse>,
}

// --- Setup DTOs ---

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SetupStatusResponse {
    pub success: bool,
    pub setup_completed: bool,
    pub setup_step: i64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SetupStepResponse {
    pub success: bool,
    pub setup_step: i64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Default)]
pub struct SaveStepRequest {
    /// Step 1 payload. Selection is client-held state; recorded nowhere yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_integrations: Option<Vec<Uuid>>,
    /// Step 2 payload: integration id -> credential partial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_configurations: Option<HashMap<Uuid, CredentialMap>>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Default)]
pub struct CompleteSetupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data_sources: Option<Vec<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_enrichment_services: Option<Vec<Uuid>>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CompleteSetupResponse {
    pub success: bool,
    pub setup_completed: bool,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TestConnectionsResponse {
    pub success: bool,
    pub results: HashMap<Uuid, TestResult>,
}

// --- Lead DTOs ---

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct LeadResponse {
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

#[derive(Serialize, Deserialize, Debug, ToSchema, Default)]
pub struct UpdateLeadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

#[derive(Deserialize, Debug, utoipa::IntoParams)]
pub struct LeadListQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

#[derive(Deserialize, Debug, utoipa::IntoParams)]
pub struct LeadSearchQuery {
    pub q: String,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct LeadPageResponse {
    pub success: bool,
    pub data: Vec<LeadResponse>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenerateLeadsRequest {
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenerateLeadsData {
    pub job_id: Uuid,
    pub message: String,
}
