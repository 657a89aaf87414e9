use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::operator::Operator;

/// Repository for Operator database operations
pub struct OperatorRepository;

impl OperatorRepository {
    /// Active operators in board order: grouped, then by name
    pub async fn list_active(pool: &Pool<Postgres>) -> Result<Vec<Operator>, sqlx::Error> {
        let operators = sqlx::query_as::<_, Operator>(
            r#"
            SELECT id, name, color, group_label, active
            FROM operators
            WHERE active
            ORDER BY group_label NULLS LAST, name, id
            "#,
        )
        .fetch_all(pool)
        .await?;

        debug!("Loaded {} active operators", operators.len());
        Ok(operators)
    }

    pub async fn exists(pool: &Pool<Postgres>, id: i32) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<_, i32>("SELECT id FROM operators WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }
}
