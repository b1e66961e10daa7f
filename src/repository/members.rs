//! Members repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::member::Member};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the member with this exact name, creating it on first use.
    ///
    /// Relies on the unique constraint on `members.name`; the no-op update makes
    /// `RETURNING` yield the existing row on conflict.
    pub async fn find_or_create_by_name(&self, name: &str) -> AppResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }
}
