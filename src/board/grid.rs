//! Weekly operator x day matrix.
//!
//! The grid is derived data: every build starts from the authoritative job list
//! and rebuilds the per-cell index from scratch. Nothing here is mutated after
//! construction.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::api::job::models::Job;
use crate::api::operator::Operator;
use crate::board::cell::CellKey;

pub const DAYS_PER_WEEK: usize = 7;

/// Seven consecutive days starting on a Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    start: NaiveDate,
    end: NaiveDate,
}

/// The Monday-based week around a date falls outside the calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOutOfRange(pub NaiveDate);

impl fmt::Display for WeekOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no full Monday-Sunday week exists around {}", self.0)
    }
}

impl std::error::Error for WeekOutOfRange {}

impl Week {
    /// The Monday-based week that contains `date`
    pub fn containing(date: NaiveDate) -> Result<Self, WeekOutOfRange> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_days(Days::new(offset))
            .ok_or(WeekOutOfRange(date))?;
        let end = start
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))
            .ok_or(WeekOutOfRange(date))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week (Sunday), inclusive
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(DAYS_PER_WEEK)
    }

    /// The following week, if the calendar has one
    pub fn next(&self) -> Option<Self> {
        self.end.succ_opt().and_then(|day| Self::containing(day).ok())
    }

    pub fn previous(&self) -> Option<Self> {
        self.start.pred_opt().and_then(|day| Self::containing(day).ok())
    }
}

/// Jobs grouped by the cell they render in, in source order.
///
/// Unassigned jobs have no cell and are dropped while indexing.
#[derive(Debug, Default)]
pub struct JobsByCell<'a> {
    cells: HashMap<CellKey, Vec<&'a Job>>,
}

impl<'a> JobsByCell<'a> {
    pub fn build(jobs: &'a [Job]) -> Self {
        let mut cells: HashMap<CellKey, Vec<&'a Job>> = HashMap::new();
        for job in jobs {
            if let Some(operator_id) = job.operator_id {
                cells
                    .entry(CellKey::new(operator_id, job.scheduled_date))
                    .or_default()
                    .push(job);
            }
        }
        Self { cells }
    }

    pub fn jobs(&self, key: &CellKey) -> &[&'a Job] {
        self.cells.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One drop target: an operator's day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Drop-target id handed to the drag layer
    pub id: CellKey,
    pub operator_id: i32,
    pub date: NaiveDate,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub operator: Operator,
    pub cells: Vec<GridCell>,
}

/// The rendered scheduling board for one week
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGrid {
    pub week_start: NaiveDate,
    /// Monday of the week before, for paging
    pub previous_week: Option<NaiveDate>,
    pub next_week: Option<NaiveDate>,
    pub days: Vec<NaiveDate>,
    pub rows: Vec<GridRow>,
}

impl WeekGrid {
    /// Lay out one row per operator and one cell per day of `week`.
    ///
    /// Rows follow the operator order given; cells hold the matching jobs in
    /// the order they appear in `jobs`.
    pub fn build(week: Week, operators: &[Operator], jobs: &[Job]) -> Self {
        let index = JobsByCell::build(jobs);
        let days: Vec<NaiveDate> = week.days().collect();

        let rows = operators
            .iter()
            .map(|operator| GridRow {
                operator: operator.clone(),
                cells: days
                    .iter()
                    .map(|&date| {
                        let key = CellKey::new(operator.id, date);
                        GridCell {
                            id: key,
                            operator_id: operator.id,
                            date,
                            jobs: index.jobs(&key).iter().map(|&job| job.clone()).collect(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            week_start: week.start(),
            previous_week: week.previous().map(|w| w.start()),
            next_week: week.next().map(|w| w.start()),
            days,
            rows,
        }
    }

    pub fn cell(&self, key: &CellKey) -> Option<&GridCell> {
        self.rows
            .iter()
            .find(|row| row.operator.id == key.operator_id)
            .and_then(|row| row.cells.iter().find(|cell| cell.date == key.date))
    }

    /// Total number of job cards on the board
    pub fn job_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .map(|cell| cell.jobs.len())
            .sum()
    }
}
