use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A field operator who can be assigned jobs on the board
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: i32,
    pub name: String,
    /// Display colour for the operator's row and job cards, `#rrggbb`
    pub color: String,
    pub group_label: Option<String>,
    pub active: bool,
}
