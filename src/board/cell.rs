//! Drop-target addressing for the scheduling board.
//!
//! A cell is one (operator, day) pair. Inside the crate it is always the typed
//! [`CellKey`]; the `cell-{operator}-{YYYY-MM-DD}` string form only exists at the
//! drag-and-drop boundary, where the UI hands back the id of the target it was
//! released over.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const CELL_PREFIX: &str = "cell";
const DELIMITER: char = '-';
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coordinates of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub operator_id: i32,
    pub date: NaiveDate,
}

/// Why a drop-target id could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKeyError {
    /// The id does not start with `cell-`
    MissingPrefix(String),
    /// The operator segment is empty or not an integer
    InvalidOperator(String),
    /// Nothing follows the operator segment
    MissingDate,
    /// The trailing segments do not form a `YYYY-MM-DD` date
    InvalidDate(String),
}

impl fmt::Display for CellKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKeyError::MissingPrefix(id) => write!(f, "not a cell id: {}", id),
            CellKeyError::InvalidOperator(seg) => write!(f, "invalid operator id in cell id: {}", seg),
            CellKeyError::MissingDate => write!(f, "cell id has no date"),
            CellKeyError::InvalidDate(seg) => write!(f, "invalid date in cell id: {}", seg),
        }
    }
}

impl std::error::Error for CellKeyError {}

impl CellKey {
    pub fn new(operator_id: i32, date: NaiveDate) -> Self {
        Self { operator_id, date }
    }

    /// Drop-target id for this cell
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse a drop-target id back into coordinates.
    ///
    /// The date itself contains the delimiter, so everything after the operator
    /// segment is joined back together before parsing it.
    pub fn decode(id: &str) -> Result<Self, CellKeyError> {
        let rest = id
            .strip_prefix(CELL_PREFIX)
            .and_then(|rest| rest.strip_prefix(DELIMITER))
            .ok_or_else(|| CellKeyError::MissingPrefix(id.to_string()))?;

        let mut segments = rest.split(DELIMITER);
        let operator_segment = segments.next().unwrap_or_default();
        if operator_segment.is_empty() || !operator_segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CellKeyError::InvalidOperator(operator_segment.to_string()));
        }
        let operator_id = operator_segment
            .parse::<i32>()
            .map_err(|_| CellKeyError::InvalidOperator(operator_segment.to_string()))?;

        let date_segment = segments.collect::<Vec<_>>().join("-");
        if date_segment.is_empty() {
            return Err(CellKeyError::MissingDate);
        }
        // chrono accepts unpadded fields, the board only ever emits the canonical form
        let date = NaiveDate::parse_from_str(&date_segment, DATE_FORMAT)
            .ok()
            .filter(|date| date.format(DATE_FORMAT).to_string() == date_segment)
            .ok_or_else(|| CellKeyError::InvalidDate(date_segment.clone()))?;

        Ok(Self { operator_id, date })
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            CELL_PREFIX,
            DELIMITER,
            self.operator_id,
            DELIMITER,
            self.date.format(DATE_FORMAT)
        )
    }
}

impl FromStr for CellKey {
    type Err = CellKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Self::decode(&id).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn encodes_prefix_operator_and_date() {
        assert_eq!(CellKey::new(7, date(2024, 3, 4)).encode(), "cell-7-2024-03-04");
    }

    #[test]
    fn decode_rejoins_date_segments() {
        let key = CellKey::decode("cell-12-2024-11-30").unwrap();
        assert_eq!(key, CellKey::new(12, date(2024, 11, 30)));
    }

    #[test]
    fn round_trips_across_a_year_of_dates() {
        let mut day = date(2023, 12, 25);
        for operator_id in [0, 1, 42, i32::MAX] {
            for _ in 0..400 {
                let key = CellKey::new(operator_id, day);
                assert_eq!(CellKey::decode(&key.encode()), Ok(key));
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn rejects_foreign_ids() {
        assert!(matches!(
            CellKey::decode("unassigned"),
            Err(CellKeyError::MissingPrefix(_))
        ));
        assert!(matches!(
            CellKey::decode("cellar-1-2024-03-04"),
            Err(CellKeyError::MissingPrefix(_))
        ));
        assert!(matches!(
            CellKey::decode("job-7-2024-03-04"),
            Err(CellKeyError::MissingPrefix(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_operator() {
        assert_eq!(
            CellKey::decode("cell-abc-2024-03-04"),
            Err(CellKeyError::InvalidOperator("abc".to_string()))
        );
        assert_eq!(
            CellKey::decode("cell--5-2024-03-04"),
            Err(CellKeyError::InvalidOperator(String::new()))
        );
        assert!(matches!(
            CellKey::decode("cell-99999999999-2024-03-04"),
            Err(CellKeyError::InvalidOperator(_))
        ));
    }

    #[test]
    fn rejects_missing_or_malformed_date() {
        assert_eq!(CellKey::decode("cell-7"), Err(CellKeyError::MissingDate));
        assert!(matches!(
            CellKey::decode("cell-7-2024-03"),
            Err(CellKeyError::InvalidDate(_))
        ));
        assert!(matches!(
            CellKey::decode("cell-7-2024-02-30"),
            Err(CellKeyError::InvalidDate(_))
        ));
        assert!(matches!(
            CellKey::decode("cell-7-2024-3-4"),
            Err(CellKeyError::InvalidDate(_))
        ));
    }

    #[test]
    fn serializes_as_drop_target_id() {
        let key = CellKey::new(3, date(2024, 1, 8));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"cell-3-2024-01-08\"");
        let back: CellKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<CellKey>("\"cell-x-2024-01-08\"").is_err());
    }
}
