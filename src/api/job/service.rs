use actix_web::{HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use std::fmt;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::board::JobUpdater;
use crate::board::WeekOutOfRange;
use crate::db::job_repository::JobRepository;
use crate::db::operator_repository::OperatorRepository;
use super::dto::JobResponse;
use super::models::{Job, JobListQuery, JobPatch, NewJob};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Validation failed
    ValidationError(String),

    /// Job not found
    NotFound(i32),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::DatabaseError(e)
    }
}

impl From<WeekOutOfRange> for ServiceError {
    fn from(e: WeekOutOfRange) -> Self {
        ServiceError::ValidationError(e.to_string())
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                })
            }
        }
    }
}

/// Job service containing business logic
#[derive(Clone)]
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// List jobs between optional inclusive date bounds
    ///
    /// # Returns
    /// - `Ok(Vec<Job>)` - ordered by day, start time, id
    /// - `Err(ServiceError::ValidationError)` - `start` is after `end`
    pub async fn list_jobs(&self, query: &JobListQuery) -> Result<Vec<Job>, ServiceError> {
        check_range(query)?;

        let jobs = JobRepository::list(&self.pool, query.start, query.end).await?;
        info!(
            "Service: Listed {} jobs (start={:?}, end={:?})",
            jobs.len(),
            query.start,
            query.end
        );
        Ok(jobs)
    }

    pub async fn get_job(&self, id: i32) -> Result<Job, ServiceError> {
        JobRepository::find(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create a single job
    ///
    /// # Business Logic
    /// - Rejects references to unknown operators
    /// - Creates job in database
    /// - Logs the operation
    pub async fn create_job(&self, job: &NewJob) -> Result<JobResponse, ServiceError> {
        info!("Service: Creating job with title={}", job.title);

        if let Some(operator_id) = job.operator_id {
            self.ensure_operator(operator_id).await?;
        }

        let job = JobRepository::create(&self.pool, job).await?;

        info!("Service: Job created successfully with id={}", job.id);

        Ok(JobResponse {
            message: "Job created successfully".to_string(),
            job,
        })
    }

    /// Apply a partial update to a job
    ///
    /// # Returns
    /// - `Ok(Job)` - the updated record
    /// - `Err(ServiceError::NotFound)` - no job with that id
    /// - `Err(ServiceError::ValidationError)` - empty patch or unknown operator
    pub async fn update_job(&self, id: i32, patch: &JobPatch) -> Result<Job, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::ValidationError(
                "Update must change at least one field".to_string(),
            ));
        }
        if let Some(Some(operator_id)) = patch.operator_id {
            self.ensure_operator(operator_id).await?;
        }

        let job = JobRepository::update(&self.pool, id, patch)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Job {} updated", id);
        Ok(job)
    }

    async fn ensure_operator(&self, operator_id: i32) -> Result<(), ServiceError> {
        if OperatorRepository::exists(&self.pool, operator_id).await? {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "Operator {} does not exist",
                operator_id
            )))
        }
    }
}

impl JobUpdater for JobService {
    type Error = ServiceError;

    async fn update_job(&self, id: i32, patch: JobPatch) -> Result<Job, ServiceError> {
        JobService::update_job(self, id, &patch).await
    }
}

/// Reject inverted date bounds
pub fn check_range(query: &JobListQuery) -> Result<(), ServiceError> {
    match (query.start, query.end) {
        (Some(start), Some(end)) if start > end => Err(ServiceError::ValidationError(format!(
            "start ({}) must not be after end ({})",
            start, end
        ))),
        _ => Ok(()),
    }
}
