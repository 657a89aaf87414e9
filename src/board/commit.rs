use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::job::models::{Job, JobPatch};
use crate::board::cell::CellKey;
use crate::board::drag::DragPayload;

/// Persists job changes on behalf of the board
#[allow(async_fn_in_trait)]
pub trait JobUpdater {
    type Error: fmt::Display;

    async fn update_job(&self, id: i32, patch: JobPatch) -> Result<Job, Self::Error>;
}

impl<U: JobUpdater> JobUpdater for &U {
    type Error = U::Error;

    async fn update_job(&self, id: i32, patch: JobPatch) -> Result<Job, Self::Error> {
        (**self).update_job(id, patch).await
    }
}

/// What happened to a drop, as reported back to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DropOutcome {
    /// The job was moved; carries the updated record
    Committed { job: Job },
    /// Dropped back on its own cell, nothing written
    Unchanged,
    /// Released outside the board or over an unknown target
    Cancelled,
    /// The update was rejected; the message is shown to the user
    Failed { message: String },
}

impl DropOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, DropOutcome::Committed { .. })
    }
}

/// Turns a completed drop into at most one job update
pub struct AssignmentCommitter<U> {
    updater: U,
}

impl<U: JobUpdater> AssignmentCommitter<U> {
    pub fn new(updater: U) -> Self {
        Self { updater }
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    /// Move the dragged job to `target`.
    ///
    /// Only `operatorId` and `scheduledDate` are sent, and only when one of them
    /// differs from where the job was picked up.
    pub async fn commit(&self, payload: &DragPayload, target: CellKey) -> DropOutcome {
        if payload.origin() == target {
            debug!("Job {} dropped on its own cell {}, skipping update", payload.job_id, target);
            return DropOutcome::Unchanged;
        }

        let patch = JobPatch::assignment(target.operator_id, target.date);
        match self.updater.update_job(payload.job_id, patch).await {
            Ok(job) => {
                info!(
                    "Job {} moved from {} to {}",
                    payload.job_id,
                    payload.origin(),
                    target
                );
                DropOutcome::Committed { job }
            }
            Err(e) => {
                warn!("Failed to move job {} to {}: {}", payload.job_id, target, e);
                DropOutcome::Failed {
                    message: format!("Could not reschedule \"{}\": {}", payload.title, e),
                }
            }
        }
    }
}
