//! Repository layer for database operations

pub mod collections;
pub mod loans;
pub mod members;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        collection::{Collection, CollectionInput},
        loan::{CreateLoan, Loan, LoanHistoryEntry, MemberLoan},
        member::Member,
    },
};

/// Storage operations the services depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn list_collections(&self) -> AppResult<Vec<Collection>>;
    async fn get_collection(&self, id: i32) -> AppResult<Collection>;
    async fn create_collection(&self, data: &CollectionInput) -> AppResult<Collection>;
    async fn update_collection(&self, id: i32, data: &CollectionInput) -> AppResult<Collection>;
    async fn resize_collection(&self, id: i32, total_copies: i32) -> AppResult<Collection>;
    async fn delete_collection(&self, id: i32) -> AppResult<()>;

    async fn find_or_create_member(&self, name: &str) -> AppResult<Member>;

    async fn get_loan(&self, id: i32) -> AppResult<Loan>;
    async fn list_loans(&self) -> AppResult<Vec<Loan>>;
    async fn loan_history(&self) -> AppResult<Vec<LoanHistoryEntry>>;
    async fn active_loans_by_member(&self, name: &str) -> AppResult<Vec<MemberLoan>>;
    async fn create_loan(&self, loan: &CreateLoan) -> AppResult<i32>;
    async fn return_loan(&self, loan_id: i32) -> AppResult<Loan>;

    /// Round trip to the database
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub collections: collections::CollectionsRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            collections: collections::CollectionsRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl LibraryStore for Repository {
    async fn list_collections(&self) -> AppResult<Vec<Collection>> {
        self.collections.list().await
    }

    async fn get_collection(&self, id: i32) -> AppResult<Collection> {
        self.collections.get_by_id(id).await
    }

    async fn create_collection(&self, data: &CollectionInput) -> AppResult<Collection> {
        self.collections.create(data).await
    }

    async fn update_collection(&self, id: i32, data: &CollectionInput) -> AppResult<Collection> {
        self.collections.update(id, data).await
    }

    async fn resize_collection(&self, id: i32, total_copies: i32) -> AppResult<Collection> {
        self.collections.resize(id, total_copies).await
    }

    async fn delete_collection(&self, id: i32) -> AppResult<()> {
        self.collections.delete(id).await
    }

    async fn find_or_create_member(&self, name: &str) -> AppResult<Member> {
        self.members.find_or_create_by_name(name).await
    }

    async fn get_loan(&self, id: i32) -> AppResult<Loan> {
        self.loans.get_by_id(id).await
    }

    async fn list_loans(&self) -> AppResult<Vec<Loan>> {
        self.loans.list().await
    }

    async fn loan_history(&self) -> AppResult<Vec<LoanHistoryEntry>> {
        self.loans.history().await
    }

    async fn active_loans_by_member(&self, name: &str) -> AppResult<Vec<MemberLoan>> {
        self.loans.active_by_member_name(name).await
    }

    async fn create_loan(&self, loan: &CreateLoan) -> AppResult<i32> {
        self.loans.create(loan).await
    }

    async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        self.loans.return_loan(loan_id).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
