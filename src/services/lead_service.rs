use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Lead;
use crate::db::repositories::lead_repository::LeadRepository;
use crate::dto::{
    GenerateLeadsData, GenerateLeadsRequest, LeadListQuery, LeadPageResponse, LeadResponse,
    LeadSearchQuery, UpdateLeadRequest,
};
use crate::errors::ApiError;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

const SORTABLE_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "title",
    "email",
    "company_name",
    "status",
    "score",
    "created_at",
    "updated_at",
];

const LEAD_STATUSES: &[&str] = &[
    "new",
    "contacted",
    "qualified",
    "unqualified",
    "customer",
    "archived",
];

pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: LeadRepository::new(pool),
        }
    }

    pub async fn list_leads(&self, query: &LeadListQuery) -> Result<LeadPageResponse, ApiError> {
        let (page, limit) = paging(query.page, query.limit);

        let sort_column = match query.sort_by.as_deref() {
            None => "created_at",
            Some(column) if SORTABLE_COLUMNS.contains(&column) => column,
            Some(column) => {
                return Err(ApiError::Validation(format!(
                    "Cannot sort by '{}'",
                    column
                )))
            }
        };
        let sort_dir = match query.sort_order.as_deref() {
            None | Some("desc") => "DESC",
            Some("asc") => "ASC",
            Some(other) => {
                return Err(ApiError::Validation(format!(
                    "Invalid sort order '{}'",
                    other
                )))
            }
        };

        let leads = self
            .repo
            .list(sort_column, sort_dir, limit, (page - 1) * limit)
            .await?;
        let total = self.repo.count().await?;

        Ok(LeadPageResponse {
            success: true,
            data: leads.into_iter().map(map_lead).collect(),
            page,
            limit,
            total,
        })
    }

    pub async fn search_leads(&self, query: &LeadSearchQuery) -> Result<LeadPageResponse, ApiError> {
        let (page, limit) = paging(query.page, query.limit);
        let pattern = format!("%{}%", query.q);

        let leads = self
            .repo
            .search(&pattern, limit, (page - 1) * limit)
            .await?;
        let total = self.repo.search_count(&pattern).await?;

        Ok(LeadPageResponse {
            success: true,
            data: leads.into_iter().map(map_lead).collect(),
            page,
            limit,
            total,
        })
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<LeadResponse, ApiError> {
        let lead = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;
        Ok(map_lead(lead))
    }

    pub async fn update_lead(
        &self,
        id: Uuid,
        request: &UpdateLeadRequest,
    ) -> Result<LeadResponse, ApiError> {
        let mut lead = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

        if let Some(status) = &request.status {
            if !LEAD_STATUSES.contains(&status.as_str()) {
                return Err(ApiError::Validation(format!(
                    "Invalid lead status '{}'",
                    status
                )));
            }
            lead.status = status.clone();
        }
        if let Some(score) = request.score {
            if !(0..=100).contains(&score) {
                return Err(ApiError::Validation(
                    "Lead score must be between 0 and 100".to_string(),
                ));
            }
            lead.score = Some(score);
        }
        if let Some(first_name) = &request.first_name {
            lead.first_name = first_name.clone();
        }
        if let Some(last_name) = &request.last_name {
            lead.last_name = last_name.clone();
        }
        if let Some(title) = &request.title {
            lead.title = title.clone();
        }
        if let Some(email) = &request.email {
            lead.email = email.clone();
        }
        if let Some(company_name) = &request.company_name {
            lead.company_name = company_name.clone();
        }

        let saved = self.repo.save(&lead).await?;
        Ok(map_lead(saved))
    }

    pub async fn delete_lead(&self, id: Uuid) -> Result<(), ApiError> {
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(ApiError::NotFound("Lead not found".to_string()));
        }
        Ok(())
    }

    pub async fn export_csv(&self) -> Result<String, ApiError> {
        let leads = self.repo.list_all().await?;

        let mut out = String::from(
            "id,first_name,last_name,title,email,company_name,source,status,score,created_at\n",
        );
        for lead in leads {
            let score = lead.score.map(|s| s.to_string()).unwrap_or_default();
            let fields = [
                lead.id.to_string(),
                lead.first_name,
                lead.last_name,
                lead.title,
                lead.email,
                lead.company_name,
                lead.source,
                lead.status,
                score,
                lead.created_at.to_rfc3339(),
            ];
            let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }

        Ok(out)
    }

    /// Stub: validates the request and hands back a job id. There is no
    /// backing pipeline; callers poll a job that never progresses.
    pub async fn start_generation(
        &self,
        request: &GenerateLeadsRequest,
    ) -> Result<GenerateLeadsData, ApiError> {
        let sources_present = request
            .sources
            .as_ref()
            .is_some_and(|sources| !sources.is_empty());
        if !sources_present {
            return Err(ApiError::Validation(
                "At least one data source must be specified".to_string(),
            ));
        }
        if request.criteria.is_none() {
            return Err(ApiError::Validation(
                "Search criteria must be provided".to_string(),
            ));
        }

        let job_id = Uuid::new_v4();
        tracing::info!(%job_id, "lead generation requested");

        Ok(GenerateLeadsData {
            job_id,
            message: "Lead generation process started successfully".to_string(),
        })
    }
}

fn paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

fn map_lead(lead: Lead) -> LeadResponse {
    LeadResponse {
        id: lead.id,
        first_name: lead.first_name,
        last_name: lead.last_name,
        title: lead.title,
        email: lead.email,
        company_name: lead.company_name,
        source: lead.source,
        status: lead.status,
        score: lead.score,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_quotes_only_when_needed() {
        assert_eq!(csv_escape("Acme Inc"), "Acme Inc");
        assert_eq!(csv_escape("Acme, Inc"), "\"Acme, Inc\"");
        assert_eq!(csv_escape("Say \"hi\""), "\"Say \"\"hi\"\"\"");
    }

    #[test]
    fn paging_clamps_out_of_range_values() {
        assert_eq!(paging(None, None), (1, 20));
        assert_eq!(paging(Some(0), Some(0)), (1, 1));
        assert_eq!(paging(Some(3), Some(500)), (3, 100));
    }
}
