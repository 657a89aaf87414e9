#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use dispatch_scheduler::api::job::{Job, JobPatch, JobStatus, ServiceError};
use dispatch_scheduler::api::operator::Operator;
use dispatch_scheduler::api::schedule::BoardStore;
use dispatch_scheduler::board::JobUpdater;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn job(id: i32, operator_id: Option<i32>, scheduled_date: NaiveDate) -> Job {
    Job {
        id,
        title: format!("Job {}", id),
        description: None,
        customer_id: None,
        operator_id,
        scheduled_date,
        start_time: None,
        status: JobStatus::Scheduled,
        address: None,
        customer: None,
        operator: None,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

pub fn operator(id: i32, name: &str) -> Operator {
    Operator {
        id,
        name: name.to_string(),
        color: "#10b981".to_string(),
        group_label: Some("North".to_string()),
        active: true,
    }
}

/// In-memory job store that records every call it receives
#[derive(Default)]
pub struct FakeJobs {
    jobs: Mutex<Vec<Job>>,
    operators: Vec<Operator>,
    reject_updates: bool,
    requests: Mutex<Vec<(i32, serde_json::Value)>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeJobs {
    pub fn with(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            ..Self::default()
        }
    }

    pub fn with_operators(mut self, operators: Vec<Operator>) -> Self {
        self.operators = operators;
        self
    }

    /// Every update fails as if the row had been deleted meanwhile
    pub fn rejecting_updates(mut self) -> Self {
        self.reject_updates = true;
        self
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    /// Update requests as `(job id, JSON body)`
    pub fn requests(&self) -> Vec<(i32, serde_json::Value)> {
        self.requests.lock().unwrap().clone()
    }

    /// Names of the store operations in the order they ran
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl JobUpdater for FakeJobs {
    type Error = String;

    async fn update_job(&self, id: i32, patch: JobPatch) -> Result<Job, String> {
        self.record("update");
        self.requests
            .lock()
            .unwrap()
            .push((id, serde_json::to_value(&patch).unwrap()));

        if self.reject_updates {
            return Err(format!("Job not found: {}", id));
        }

        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| format!("Job not found: {}", id))?;
        if let Some(operator_id) = patch.operator_id {
            job.operator_id = operator_id;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            job.scheduled_date = scheduled_date;
        }
        Ok(job.clone())
    }
}

impl BoardStore for FakeJobs {
    async fn operators(&self) -> Result<Vec<Operator>, ServiceError> {
        self.record("operators");
        Ok(self.operators.clone())
    }

    async fn jobs_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Job>, ServiceError> {
        self.record("jobs_between");
        Ok(self
            .jobs()
            .into_iter()
            .filter(|job| start <= job.scheduled_date && job.scheduled_date <= end)
            .collect())
    }

    async fn job(&self, id: i32) -> Result<Job, ServiceError> {
        self.record("job");
        self.jobs()
            .into_iter()
            .find(|job| job.id == id)
            .ok_or(ServiceError::NotFound(id))
    }
}
