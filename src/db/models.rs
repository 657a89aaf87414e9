use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::FromRow;

use crate::api::job::models::{CustomerSummary, Job, OperatorSummary};

/// Database representation of a job joined with its customer and operator names
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub customer_id: Option<i32>,
    pub operator_id: Option<i32>,
    pub scheduled_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub status: String,
    pub address: Option<String>,
    pub customer_name: Option<String>,
    pub operator_name: Option<String>,
    pub operator_color: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<JobRow> for Job {
    type Error = sqlx::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let customer = match (row.customer_id, row.customer_name) {
            (Some(id), Some(name)) => Some(CustomerSummary { id, name }),
            _ => None,
        };
        let operator = match (row.operator_id, row.operator_name, row.operator_color) {
            (Some(id), Some(name), Some(color)) => Some(OperatorSummary { id, name, color }),
            _ => None,
        };

        Ok(Job {
            id: row.id,
            title: row.title,
            description: row.description,
            customer_id: row.customer_id,
            operator_id: row.operator_id,
            scheduled_date: row.scheduled_date,
            start_time: row.start_time,
            status,
            address: row.address,
            customer,
            operator,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
