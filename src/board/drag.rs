use std::fmt;
use std::mem;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::job::models::Job;
use crate::board::cell::CellKey;
use crate::board::commit::{AssignmentCommitter, DropOutcome, JobUpdater};

/// Pointer travel, in CSS pixels, before a press on a job card becomes a drag
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

/// The job record carried by a drag gesture.
///
/// Built from a [`Job`] when the gesture starts, so anything that reads it back
/// can rely on the job being assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub job_id: i32,
    pub operator_id: i32,
    pub scheduled_date: NaiveDate,
    pub title: String,
}

impl DragPayload {
    /// Cell the job was picked up from
    pub fn origin(&self) -> CellKey {
        CellKey::new(self.operator_id, self.scheduled_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Unassigned jobs are not on the board and cannot be dragged
    Unassigned(i32),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Unassigned(id) => write!(f, "Job {} has no operator and is not on the board", id),
        }
    }
}

impl std::error::Error for PayloadError {}

impl TryFrom<&Job> for DragPayload {
    type Error = PayloadError;

    fn try_from(job: &Job) -> Result<Self, Self::Error> {
        let operator_id = job.operator_id.ok_or(PayloadError::Unassigned(job.id))?;
        Ok(Self {
            job_id: job.id,
            operator_id,
            scheduled_date: job.scheduled_date,
            title: job.title.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragPayload),
}

/// Result of letting go of a dragged card.
///
/// This is the transient dropped state: the controller is already idle again
/// when it is handed out, and a pending commit only needs to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    /// Nothing was being dragged, or the card landed outside a known cell
    Cancelled,
    Commit { payload: DragPayload, target: CellKey },
}

impl Release {
    /// Run the pending commit, if any
    pub async fn commit_with<U: JobUpdater>(self, committer: &AssignmentCommitter<U>) -> DropOutcome {
        match self {
            Release::Cancelled => DropOutcome::Cancelled,
            Release::Commit { payload, target } => committer.commit(&payload, target).await,
        }
    }
}

/// Tracks the card being dragged across the board
#[derive(Debug)]
pub struct DragController {
    activation_distance: f64,
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Payload to render in the drag overlay
    pub fn active(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging(payload) => Some(payload),
            DragState::Idle => None,
        }
    }

    /// Feed pointer travel since the press on a card.
    ///
    /// Starts the drag once travel reaches the activation distance. Returns
    /// whether a drag is in progress afterwards.
    pub fn pointer_moved(&mut self, payload: DragPayload, distance: f64) -> bool {
        if let DragState::Idle = self.state {
            if distance >= self.activation_distance {
                self.pick_up(payload);
            }
        }
        self.active().is_some()
    }

    /// Start dragging without an activation check
    pub fn pick_up(&mut self, payload: DragPayload) {
        debug!("Drag started for job {} from {}", payload.job_id, payload.origin());
        self.state = DragState::Dragging(payload);
    }

    /// Let go of the card over `over`, the id of the drop target under the
    /// pointer if there is one. Always leaves the controller idle.
    pub fn release(&mut self, over: Option<&str>) -> Release {
        let payload = match mem::take(&mut self.state) {
            DragState::Dragging(payload) => payload,
            DragState::Idle => return Release::Cancelled,
        };

        let Some(over) = over else {
            debug!("Job {} released outside the board", payload.job_id);
            return Release::Cancelled;
        };

        match CellKey::decode(over) {
            Ok(target) => Release::Commit { payload, target },
            Err(e) => {
                debug!("Job {} released over {}: {}", payload.job_id, over, e);
                Release::Cancelled
            }
        }
    }

    /// Release and run the resulting commit
    pub async fn drop_on<U: JobUpdater>(
        &mut self,
        over: Option<&str>,
        committer: &AssignmentCommitter<U>,
    ) -> DropOutcome {
        self.release(over).commit_with(committer).await
    }
}
