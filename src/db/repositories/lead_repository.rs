use chrono::Utc;
use sqlx::{Result, SqlitePool};
use uuid::Uuid;

use crate::db::models::Lead;

const LEAD_COLUMNS: &str = "id, first_name, last_name, title, email, company_name, \
                            source, status, score, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct LeadRepository {
    pool: SqlitePool,
}

impl LeadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, lead: &Lead) -> Result<Lead> {
        sqlx::query(
            r#"
            INSERT INTO leads
                (id, first_name, last_name, title, email, company_name,
                 source, status, score, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(lead.id)
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.title)
        .bind(&lead.email)
        .bind(&lead.company_name)
        .bind(&lead.source)
        .bind(&lead.status)
        .bind(lead.score)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(lead.id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>> {
        sqlx::query_as::<_, Lead>(&format!(
            "SELECT {} FROM leads WHERE id = ?1",
            LEAD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// `sort_column` and `sort_dir` must come from the service whitelist;
    /// they are interpolated into the statement.
    pub async fn list(
        &self,
        sort_column: &str,
        sort_dir: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>> {
        sqlx::query_as::<_, Lead>(&format!(
            "SELECT {} FROM leads ORDER BY {} {} LIMIT ?1 OFFSET ?2",
            LEAD_COLUMNS, sort_column, sort_dir
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<Lead>> {
        sqlx::query_as::<_, Lead>(&format!(
            "SELECT {} FROM leads ORDER BY created_at ASC",
            LEAD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn search(&self, pattern: &str, limit: i64, offset: i64) -> Result<Vec<Lead>> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {} FROM leads
            WHERE first_name LIKE ?1 OR last_name LIKE ?1 OR title LIKE ?1
               OR email LIKE ?1 OR company_name LIKE ?1
            ORDER BY created_at DESC
            LIMIT ?2 OFFSET ?3
            "#,
            LEAD_COLUMNS
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn search_count(&self, pattern: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM leads
            WHERE first_name LIKE ?1 OR last_name LIKE ?1 OR title LIKE ?1
               OR email LIKE ?1 OR company_name LIKE ?1
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn save(&self, lead: &Lead) -> Result<Lead> {
        sqlx::query(
            r#"
            UPDATE leads
            SET first_name = ?1, last_name = ?2, title = ?3, email = ?4,
                company_name = ?5, status = ?6, score = ?7, updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.title)
        .bind(&lead.email)
        .bind(&lead.company_name)
        .bind(&lead.status)
        .bind(lead.score)
        .bind(Utc::now())
        .bind(lead.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(lead.id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
