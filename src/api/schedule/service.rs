use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use crate::api::job::models::{Job, JobListQuery};
use crate::api::job::{JobService, ServiceError};
use crate::api::operator::Operator;
use crate::board::{
    AssignmentCommitter, DragController, DragPayload, DropOutcome, JobUpdater, PayloadError, Week,
    WeekGrid,
};
use crate::db::operator_repository::OperatorRepository;
use super::dto::{DropRequest, DropResponse};

/// Read side of the board: what a render and a drop need to look up
#[allow(async_fn_in_trait)]
pub trait BoardStore {
    async fn operators(&self) -> Result<Vec<Operator>, ServiceError>;

    /// Jobs scheduled between the inclusive bounds, in display order
    async fn jobs_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Job>, ServiceError>;

    /// A single job, `ServiceError::NotFound` when missing
    async fn job(&self, id: i32) -> Result<Job, ServiceError>;
}

impl BoardStore for JobService {
    async fn operators(&self) -> Result<Vec<Operator>, ServiceError> {
        Ok(OperatorRepository::list_active(self.pool()).await?)
    }

    async fn jobs_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Job>, ServiceError> {
        let query = JobListQuery {
            start: Some(start),
            end: Some(end),
        };
        self.list_jobs(&query).await
    }

    async fn job(&self, id: i32) -> Result<Job, ServiceError> {
        self.get_job(id).await
    }
}

/// Board rendering and drop handling
#[derive(Clone)]
pub struct ScheduleService<S = JobService> {
    store: S,
    activation_distance: f64,
}

impl ScheduleService {
    pub fn from_pool(pool: Pool<Postgres>, activation_distance: f64) -> Self {
        Self::new(JobService::new(pool), activation_distance)
    }
}

impl<S> ScheduleService<S>
where
    S: BoardStore + JobUpdater,
{
    pub fn new(store: S, activation_distance: f64) -> Self {
        Self {
            store,
            activation_distance,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the board for `week` from the current operators and jobs
    pub async fn week_grid(&self, week: Week) -> Result<WeekGrid, ServiceError> {
        let operators = self.store.operators().await?;
        let jobs = self.store.jobs_between(week.start(), week.end()).await?;

        let grid = WeekGrid::build(week, &operators, &jobs);
        debug!(
            "Built board for week of {}: {} operators, {} of {} jobs placed",
            week.start(),
            operators.len(),
            grid.job_count(),
            jobs.len()
        );
        Ok(grid)
    }

    /// Apply a drop and answer with the refreshed board
    ///
    /// # Returns
    /// - `Ok(DropResponse)` - including cancelled, unchanged and failed drops
    /// - `Err(ServiceError::NotFound)` - the dragged job does not exist
    /// - `Err(ServiceError::ValidationError)` - the job is not on the board, or
    ///   the requested week is outside the calendar
    pub async fn drop_job(&self, request: &DropRequest) -> Result<DropResponse, ServiceError> {
        let job = self.store.job(request.job_id).await?;
        let week = Week::containing(request.week.unwrap_or(job.scheduled_date))?;
        let committer = AssignmentCommitter::new(&self.store);

        let outcome = resolve_drop(&job, request, self.activation_distance, &committer)
            .await
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        info!("Drop of job {} resolved: {:?}", job.id, outcome);

        // refetch only once the commit has resolved
        let grid = self.week_grid(week).await?;

        Ok(DropResponse { outcome, grid })
    }
}

/// Run one drag gesture for `job` through a fresh controller.
///
/// Fails only when the job cannot be attached to a drag at all.
pub async fn resolve_drop<U: JobUpdater>(
    job: &Job,
    request: &DropRequest,
    activation_distance: f64,
    committer: &AssignmentCommitter<U>,
) -> Result<DropOutcome, PayloadError> {
    let payload = DragPayload::try_from(job)?;

    let mut controller = DragController::new(activation_distance);
    match request.distance {
        Some(distance) => {
            controller.pointer_moved(payload, distance);
        }
        None => controller.pick_up(payload),
    }

    Ok(controller.drop_on(request.over.as_deref(), committer).await)
}
