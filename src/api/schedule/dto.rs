use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::board::{DropOutcome, WeekGrid};

/// Query for the board: any day inside the wanted week
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub week: Option<NaiveDate>,
}

/// A finished drag gesture reported by the UI
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub job_id: i32,
    /// Id of the drop target under the pointer on release, if any
    #[serde(default)]
    pub over: Option<String>,
    /// Week to render afterwards; defaults to the job's current week
    #[serde(default)]
    pub week: Option<NaiveDate>,
    /// Pointer travel in pixels; when present the activation threshold applies
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    pub distance: Option<f64>,
}

/// Outcome of a drop together with the board refetched after it
#[derive(Debug, Serialize)]
pub struct DropResponse {
    pub outcome: DropOutcome,
    pub grid: WeekGrid,
}
