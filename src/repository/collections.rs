//! Collections repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::collection::{Collection, CollectionInput},
};

#[derive(Clone)]
pub struct CollectionsRepository {
    pool: Pool<Postgres>,
}

impl CollectionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all collections
    pub async fn list(&self) -> AppResult<Vec<Collection>> {
        let rows = sqlx::query_as::<_, Collection>("SELECT * FROM collections ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get collection by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Collection> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection with id {} not found", id)))
    }

    /// Create a collection with every copy on the shelf
    pub async fn create(&self, data: &CollectionInput) -> AppResult<Collection> {
        let row = sqlx::query_as::<_, Collection>(
            r#"
            INSERT INTO collections (title, author, total_copies, available_copies)
            VALUES ($1, $2, $3, $3)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.total_copies)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite title, author and total copies. Available copies are left untouched.
    pub async fn update(&self, id: i32, data: &CollectionInput) -> AppResult<Collection> {
        sqlx::query_as::<_, Collection>(
            r#"
            UPDATE collections
            SET title = $1, author = $2, total_copies = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.total_copies)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection with id {} not found", id)))
    }

    /// Set total copies and shift available copies by the same delta.
    ///
    /// The shift is refused when more copies are on loan than the new total allows,
    /// or when the shifted count no longer fits the column.
    pub async fn resize(&self, id: i32, total_copies: i32) -> AppResult<Collection> {
        let mut tx = self.pool.begin().await?;

        let resized = sqlx::query_as::<_, Collection>(
            r#"
            UPDATE collections
            SET available_copies = available_copies + ($1 - total_copies),
                total_copies = $1
            WHERE id = $2
              AND available_copies::bigint + ($1::bigint - total_copies) BETWEEN 0 AND 2147483647
            RETURNING *
            "#,
        )
        .bind(total_copies)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(collection) = resized {
            tx.commit().await?;
            return Ok(collection);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM collections WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if exists {
            Err(AppError::Conflict(format!(
                "Collection {} cannot be resized to {} copies",
                id, total_copies
            )))
        } else {
            Err(AppError::NotFound(format!("Collection with id {} not found", id)))
        }
    }

    /// Delete a collection. Refused while loans still reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Collection {} is referenced by loans", id))
                } else {
                    AppError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Collection with id {} not found", id)));
        }
        Ok(())
    }
}
