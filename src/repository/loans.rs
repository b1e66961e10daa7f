//! Loans repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanHistoryEntry, MemberLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// All loan rows, active and returned
    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// All loans with member name and collection title
    pub async fn history(&self) -> AppResult<Vec<LoanHistoryEntry>> {
        let entries = sqlx::query_as::<_, LoanHistoryEntry>(
            r#"
            SELECT l.id, m.name AS member_name, c.title AS book_title,
                   l.loan_date, l.due_date, l.returned_date
            FROM loans l
            JOIN members m ON l.member_id = m.id
            JOIN collections c ON l.collection_id = c.id
            ORDER BY l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Active loans of the member with this exact name
    pub async fn active_by_member_name(&self, name: &str) -> AppResult<Vec<MemberLoan>> {
        let loans = sqlx::query_as::<_, MemberLoan>(
            r#"
            SELECT l.id, c.title AS book_title, l.loan_date, l.due_date,
                   l.returned_date, c.id AS collection_id
            FROM loans l
            JOIN members m ON l.member_id = m.id
            JOIN collections c ON l.collection_id = c.id
            WHERE m.name = $1 AND l.returned_date IS NULL
            ORDER BY l.id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Take one copy off the shelf and record the loan, as a single transaction
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        // The row lock taken by the update serializes concurrent borrows of the same collection
        let taken = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE collections
            SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            RETURNING available_copies
            "#,
        )
        .bind(loan.collection_id)
        .fetch_optional(&mut *tx)
        .await?;

        if taken.is_none() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM collections WHERE id = $1)")
                    .bind(loan.collection_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::OutOfStock(format!(
                    "No copies of collection {} available",
                    loan.collection_id
                ))
            } else {
                AppError::NotFound(format!(
                    "Collection with id {} not found",
                    loan.collection_id
                ))
            });
        }

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO loans (collection_id, member_id, loan_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(loan.collection_id)
        .bind(loan.member_id)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan_id)
    }

    /// Mark an active loan returned and put the copy back, as a single transaction
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET returned_date = NOW()
            WHERE id = $1 AND returned_date IS NULL
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Loan {} not found or already returned", loan_id))
        })?;

        sqlx::query(
            "UPDATE collections SET available_copies = available_copies + 1 WHERE id = $1",
        )
        .bind(loan.collection_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan)
    }
}
