use chrono::Utc;
use sqlx::SqlitePool;

use crate::connectors::ConnectorRegistry;
use crate::credentials;
use crate::db::models::Integration as DbIntegration;
use crate::db::repositories::integration_repository::IntegrationRepository;
use crate::dto::{
    BatchUpdateEntry, IntegrationResponse, IntegrationStatus, IntegrationType, TestResult,
    UpdateIntegrationRequest,
};
use crate::errors::ApiError;
use uuid::Uuid;

/// The fixed provider catalog seeded on first setup. Seeding is skipped
/// entirely once any integrations exist, even if this list changes.
const DEFAULT_CATALOG: &[(&str, &str)] = &[
    ("Apollo", "leadSource"),
    ("LinkedIn", "leadSource"),
    ("Crunchbase", "leadSource"),
    ("ZoomInfo", "leadSource"),
    ("Clearbit", "leadSource"),
    ("Apify", "leadSource"),
    ("Million Verifier", "enrichment"),
    ("EXA API", "enrichment"),
    ("OpenAI", "enrichment"),
    ("Clearbit Enrichment", "enrichment"),
    ("SendGrid", "email"),
    ("SMTP", "email"),
];

#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// When set, the enable toggle rejects enabling an unconfigured
    /// integration. Off by default to match the historical permissive
    /// behavior of the settings UI backend.
    pub require_configured_for_enable: bool,
}

pub struct IntegrationService {
    repo: IntegrationRepository,
    connectors: ConnectorRegistry,
    options: RegistryOptions,
}

impl IntegrationService {
    pub fn new(pool: SqlitePool, options: RegistryOptions) -> Self {
        Self {
            repo: IntegrationRepository::new(pool),
            connectors: ConnectorRegistry::new(),
            options,
        }
    }

    pub async fn list_integrations(&self) -> Result<Vec<IntegrationResponse>, ApiError> {
        let rows = self.repo.list().await?;
        rows.into_iter().map(Self::map_row_to_response).collect()
    }

    pub async fn get_integration(&self, id: Uuid) -> Result<IntegrationResponse, ApiError> {
        let row = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Integration not found".to_string()))?;
        Self::map_row_to_response(row)
    }

    /// Partial update. Credentials are shallow-merged and `is_configured`
    /// recomputed from the merged map; other fields apply directly.
    pub async fn update_integration(
        &self,
        id: Uuid,
        request: &UpdateIntegrationRequest,
    ) -> Result<IntegrationResponse, ApiError> {
        let mut row = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Integration not found".to_string()))?;

        if let Some(name) = &request.name {
            row.name = name.clone();
        }
        if let Some(integration_type) = request.integration_type {
            row.integration_type = integration_type.to_string();
        }
        if let Some(is_enabled) = request.is_enabled {
            row.is_enabled = is_enabled;
        }

        if let Some(partial) = &request.credentials {
            credentials::merge(&mut row.credentials.0, partial);
            let integration_type = Self::parse_type(&row.integration_type)?;
            row.is_configured = credentials::is_valid(integration_type, &row.credentials.0);
        }

        let saved = self.repo.save(&row).await?;
        Self::map_row_to_response(saved)
    }

    /// Direct enable/disable. Permissive by default: an unconfigured
    /// integration can be enabled unless strict mode is on.
    pub async fn toggle_integration(
        &self,
        id: Uuid,
        is_enabled: bool,
    ) -> Result<IntegrationResponse, ApiError> {
        let mut row = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Integration not found".to_string()))?;

        if self.options.require_configured_for_enable && is_enabled && !row.is_configured {
            return Err(ApiError::Validation(
                "Integration must be configured before it can be enabled".to_string(),
            ));
        }

        row.is_enabled = is_enabled;
        let saved = self.repo.save(&row).await?;
        Self::map_row_to_response(saved)
    }

    /// Seeds the provider catalog when the collection is empty. Safe to
    /// call repeatedly; a non-empty collection is left untouched.
    pub async fn initialize_defaults(&self) -> Result<(), ApiError> {
        if self.repo.count().await? > 0 {
            return Ok(());
        }

        for (name, integration_type) in DEFAULT_CATALOG {
            self.repo.create(name, integration_type).await?;
        }
        tracing::info!("Seeded {} default integrations", DEFAULT_CATALOG.len());
        Ok(())
    }

    /// Best-effort bulk update: entries without an id and unknown ids are
    /// silently dropped from the result. Database failures still abort.
    pub async fn batch_update(
        &self,
        updates: &[BatchUpdateEntry],
    ) -> Result<Vec<IntegrationResponse>, ApiError> {
        let mut results = Vec::new();

        for entry in updates {
            let Some(id) = entry.id else {
                continue;
            };
            match self.update_integration(id, &entry.update).await {
                Ok(updated) => results.push(updated),
                Err(ApiError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(results)
    }

    /// Runs the provider check and folds the outcome into the record.
    ///
    /// Unknown ids and unconfigured integrations short-circuit with a
    /// failed result and no mutation. Every dispatched check, including
    /// one that errors out, stamps `status`/`error_message`/`last_tested`.
    pub async fn test_connection(&self, id: Uuid) -> Result<TestResult, ApiError> {
        let Some(mut row) = self.repo.find_by_id(id).await? else {
            return Ok(TestResult::failed("Integration not found"));
        };

        if !row.is_configured {
            return Ok(TestResult::failed(
                "Integration is not properly configured",
            ));
        }

        let result = match self.connectors.get(&row.name) {
            Some(connector) => match connector.check(&row.credentials.0) {
                Ok(result) => result,
                Err(err) => TestResult::failed(err.to_string()),
            },
            None => TestResult::failed("Connection test not implemented for this integration"),
        };

        let status = if result.success {
            IntegrationStatus::Active
        } else {
            IntegrationStatus::Error
        };
        row.status = status.to_string();
        row.error_message = if result.success {
            None
        } else {
            result.message.clone()
        };
        row.last_tested = Some(Utc::now());
        self.repo.save(&row).await?;

        Ok(result)
    }

    fn parse_type(raw: &str) -> Result<IntegrationType, ApiError> {
        raw.parse().map_err(|e: String| {
            ApiError::Internal(format!("Corrupt integration_type in store: {}", e))
        })
    }

    fn map_row_to_response(row: DbIntegration) -> Result<IntegrationResponse, ApiError> {
        let integration_type = Self::parse_type(&row.integration_type)?;
        let status: IntegrationStatus = row.status.parse().map_err(|e: String| {
            ApiError::Internal(format!("Corrupt status in store: {}", e))
        })?;

        Ok(IntegrationResponse {
            id: row.id,
            name: row.name,
            integration_type,
            is_enabled: row.is_enabled,
            is_configured: row.is_configured,
            credentials: row.credentials.0,
            last_tested: row.last_tested,
            status,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
