use chrono::Utc;
use sqlx::{Result, SqlitePool};
use uuid::Uuid;

use crate::db::models::Integration;

#[derive(Debug, Clone)]
pub struct IntegrationRepository {
    pool: SqlitePool,
}

impl IntegrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM integrations")
            .fetch_one(&self.pool)
            .await
    }

    /// Inserts a catalog row in its default unconfigured state.
    pub async fn create(&self, name: &str, integration_type: &str) -> Result<Integration> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO integrations
                (id, name, integration_type, is_enabled, is_configured, credentials,
                 last_tested, status, error_message, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, 0, '{}', NULL, 'unconfigured', NULL, ?4, ?5)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(integration_type)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Integration>> {
        sqlx::query_as::<_, Integration>(
            r#"
            SELECT id, name, integration_type, is_enabled, is_configured, credentials,
                   last_tested, status, error_message, created_at, updated_at
            FROM integrations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Stable (type, name) ordering for UI grouping.
    pub async fn list(&self) -> Result<Vec<Integration>> {
        sqlx::query_as::<_, Integration>(
            r#"
            SELECT id, name, integration_type, is_enabled, is_configured, credentials,
                   last_tested, status, error_message, created_at, updated_at
            FROM integrations
            ORDER BY integration_type ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Writes every mutable field of the row back, stamping `updated_at`.
    /// Callers fetch, mutate in memory, then save (read-modify-write,
    /// last-write-wins).
    pub async fn save(&self, row: &Integration) -> Result<Integration> {
        sqlx::query(
            r#"
            UPDATE integrations
            SET name = ?1, integration_type = ?2, is_enabled = ?3, is_configured = ?4,
                credentials = ?5, last_tested = ?6, status = ?7, error_message = ?8,
                updated_at = ?9
            WHERE id = ?10
            "#,
        )
        .bind(&row.name)
        .bind(&row.integration_type)
        .bind(row.is_enabled)
        .bind(row.is_configured)
        .bind(&row.credentials)
        .bind(row.last_tested)
        .bind(&row.status)
        .bind(&row.error_message)
        .bind(Utc::now())
        .bind(row.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(row.id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}
