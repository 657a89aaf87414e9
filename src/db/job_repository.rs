use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::api::job::models::{Job, JobPatch, NewJob};
use crate::db::models::JobRow;

const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.description, j.customer_id, j.operator_id,
           j.scheduled_date, j.start_time, j.status, j.address,
           c.name AS customer_name,
           o.name AS operator_name,
           o.color AS operator_color,
           j.created_at, j.updated_at
    FROM jobs j
    LEFT JOIN customers c ON c.id = j.customer_id
    LEFT JOIN operators o ON o.id = j.operator_id
"#;

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// List jobs scheduled within the inclusive date bounds.
    ///
    /// Ordered by day, then start time (untimed jobs last), then id. The board
    /// keeps this order inside each cell.
    pub async fn list(
        pool: &Pool<Postgres>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        debug!("Listing jobs: start={:?}, end={:?}", start, end);

        let mut query = QueryBuilder::<Postgres>::new(JOB_SELECT);
        query.push(" WHERE TRUE");
        if let Some(start) = start {
            query.push(" AND j.scheduled_date >= ").push_bind(start);
        }
        if let Some(end) = end {
            query.push(" AND j.scheduled_date <= ").push_bind(end);
        }
        query.push(" ORDER BY j.scheduled_date, j.start_time NULLS LAST, j.id");

        let rows = query.build_query_as::<JobRow>().fetch_all(pool).await?;
        debug!("Fetched {} job rows", rows.len());

        rows.into_iter().map(Job::try_from).collect()
    }

    /// Fetch a single job with its embedded customer and operator
    pub async fn find(pool: &Pool<Postgres>, id: i32) -> Result<Option<Job>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(JOB_SELECT);
        query.push(" WHERE j.id = ").push_bind(id);

        query
            .build_query_as::<JobRow>()
            .fetch_optional(pool)
            .await?
            .map(Job::try_from)
            .transpose()
    }

    /// Create a new job in the database and return the full job record
    pub async fn create(pool: &Pool<Postgres>, job: &NewJob) -> Result<Job, sqlx::Error> {
        debug!(
            "Creating job: title={}, date={}, status={}",
            job.title, job.scheduled_date, job.status
        );

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO jobs (title, description, customer_id, operator_id,
                              scheduled_date, start_time, status, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.customer_id)
        .bind(job.operator_id)
        .bind(job.scheduled_date)
        .bind(job.start_time)
        .bind(job.status.as_str())
        .bind(&job.address)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", id);
        Self::find(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Apply a partial update. Returns `None` when the job does not exist.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        patch: &JobPatch,
    ) -> Result<Option<Job>, sqlx::Error> {
        debug!("Updating job {}: {:?}", id, patch);

        let mut query = QueryBuilder::<Postgres>::new("UPDATE jobs SET updated_at = NOW()");
        if let Some(title) = &patch.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &patch.description {
            query.push(", description = ").push_bind(description.clone());
        }
        if let Some(customer_id) = patch.customer_id {
            query.push(", customer_id = ").push_bind(customer_id);
        }
        if let Some(operator_id) = patch.operator_id {
            query.push(", operator_id = ").push_bind(operator_id);
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            query.push(", scheduled_date = ").push_bind(scheduled_date);
        }
        if let Some(start_time) = patch.start_time {
            query.push(", start_time = ").push_bind(start_time);
        }
        if let Some(status) = patch.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        if let Some(address) = &patch.address {
            query.push(", address = ").push_bind(address.clone());
        }
        query.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated = query
            .build_query_scalar::<i32>()
            .fetch_optional(pool)
            .await?;
        match updated {
            Some(id) => Self::find(pool, id).await,
            None => {
                debug!("Job {} not found for update", id);
                Ok(None)
            }
        }
    }
}
