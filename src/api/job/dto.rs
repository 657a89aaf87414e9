use serde::Serialize;

use super::models::Job;

/// Response for single job creation
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}
