use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Result, SqlitePool};
use uuid::Uuid;

use crate::db::models::SystemConfig;

#[derive(Debug, Clone)]
pub struct SystemConfigRepository {
    pool: SqlitePool,
}

impl SystemConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self) -> Result<Option<SystemConfig>> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            SELECT id, setup_completed, setup_step, default_data_sources,
                   default_enrichment_services, created_at, updated_at
            FROM system_config
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    /// Lazy singleton: returns the existing row or creates one with
    /// step=0, completed=false. Read-then-write without a transaction;
    /// a concurrent-create race is a benign lost update.
    pub async fn get_or_create(&self) -> Result<SystemConfig> {
        if let Some(config) = self.find().await? {
            return Ok(config);
        }

        let config = SystemConfig {
            id: Uuid::new_v4(),
            setup_completed: false,
            setup_step: 0,
            default_data_sources: Json(Vec::new()),
            default_enrichment_services: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO system_config
                (id, setup_completed, setup_step, default_data_sources,
                 default_enrichment_services, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(config.id)
        .bind(config.setup_completed)
        .bind(config.setup_step)
        .bind(&config.default_data_sources)
        .bind(&config.default_enrichment_services)
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn save(&self, config: &SystemConfig) -> Result<SystemConfig> {
        sqlx::query(
            r#"
            UPDATE system_config
            SET setup_completed = ?1, setup_step = ?2, default_data_sources = ?3,
                default_enrichment_services = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(config.setup_completed)
        .bind(config.setup_step)
        .bind(&config.default_data_sources)
        .bind(&config.default_enrichment_services)
        .bind(Utc::now())
        .bind(config.id)
        .execute(&self.pool)
        .await?;

        self.find().await?.ok_or(sqlx::Error::RowNotFound)
    }
}
