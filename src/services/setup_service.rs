use std::collections::HashMap;
use std::sync::Arc;

use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repositories::system_config_repository::SystemConfigRepository;
use crate::dto::{
    CompleteSetupRequest, CompleteSetupResponse, SaveStepRequest, SetupStatusResponse,
    SetupStepResponse, TestResult, UpdateIntegrationRequest,
};
use crate::errors::ApiError;
use crate::services::integration_service::IntegrationService;

pub const FIRST_STEP: i64 = 1;
pub const LAST_STEP: i64 = 4;

/// Sequences the guided setup flow:
/// select integrations -> configure APIs -> test connections -> complete.
pub struct SetupService {
    config_repo: SystemConfigRepository,
    integrations: Arc<IntegrationService>,
}

impl SetupService {
    pub fn new(pool: SqlitePool, integrations: Arc<IntegrationService>) -> Self {
        Self {
            config_repo: SystemConfigRepository::new(pool),
            integrations,
        }
    }

    pub async fn status(&self) -> Result<SetupStatusResponse, ApiError> {
        let config = self.config_repo.get_or_create().await?;
        Ok(SetupStatusResponse {
            success: true,
            setup_completed: config.setup_completed,
            setup_step: config.setup_step,
        })
    }

    /// Resets the wizard to step 1 and seeds the provider catalog.
    pub async fn start(&self) -> Result<SetupStepResponse, ApiError> {
        let mut config = self.config_repo.get_or_create().await?;
        config.setup_completed = false;
        config.setup_step = FIRST_STEP;
        let config = self.config_repo.save(&config).await?;

        self.integrations.initialize_defaults().await?;

        Ok(SetupStepResponse {
            success: true,
            setup_step: config.setup_step,
        })
    }

    /// Persists progress for one wizard step.
    ///
    /// Step 2 is the only step with server-side payload handling: each
    /// entry of `api_configurations` is merged into its integration's
    /// credential map. Unknown ids are skipped, matching the best-effort
    /// contract of the wizard. Steps 1 and 3 are client-driven.
    pub async fn save_step(
        &self,
        step: i64,
        payload: SaveStepRequest,
    ) -> Result<SetupStepResponse, ApiError> {
        if !(FIRST_STEP..=LAST_STEP).contains(&step) {
            return Err(ApiError::Validation("Invalid step number".to_string()));
        }

        let mut config = self.config_repo.get_or_create().await?;

        if step == 2 {
            if let Some(api_configurations) = payload.api_configurations {
                for (id, credentials) in api_configurations {
                    let update = UpdateIntegrationRequest {
                        credentials: Some(credentials),
                        ..Default::default()
                    };
                    match self.integrations.update_integration(id, &update).await {
                        Ok(_) => {}
                        Err(ApiError::NotFound(_)) => continue,
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        config.setup_step = step;
        let config = self.config_repo.save(&config).await?;

        Ok(SetupStepResponse {
            success: true,
            setup_step: config.setup_step,
        })
    }

    /// Terminal transition: marks setup complete and optionally records
    /// the default source/enrichment selections.
    pub async fn complete(
        &self,
        payload: CompleteSetupRequest,
    ) -> Result<CompleteSetupResponse, ApiError> {
        let mut config = self.config_repo.get_or_create().await?;
        config.setup_completed = true;

        if let Some(sources) = payload.default_data_sources {
            config.default_data_sources = Json(sources);
        }
        if let Some(services) = payload.default_enrichment_services {
            config.default_enrichment_services = Json(services);
        }

        let config = self.config_repo.save(&config).await?;

        Ok(CompleteSetupResponse {
            success: true,
            setup_completed: config.setup_completed,
        })
    }

    /// Tests every configured integration, one at a time. Unconfigured
    /// integrations are absent from the result map.
    pub async fn test_all_configured(&self) -> Result<HashMap<Uuid, TestResult>, ApiError> {
        let integrations = self.integrations.list_integrations().await?;
        let mut results = HashMap::new();

        for integration in integrations.into_iter().filter(|i| i.is_configured) {
            let result = self.integrations.test_connection(integration.id).await?;
            results.insert(integration.id, result);
        }

        Ok(results)
    }
}
