//! Loan management service

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{due_date, BorrowReceipt, CreateLoan, Loan, LoanHistoryEntry, MemberLoan},
    repository::LibraryStore,
};

use super::members::MembersService;

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn LibraryStore>,
    members: MembersService,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(store: Arc<dyn LibraryStore>, members: MembersService, config: LoansConfig) -> Self {
        Self {
            store,
            members,
            config,
        }
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<Loan> {
        self.store.get_loan(id).await
    }

    pub async fn list_loans(&self) -> AppResult<Vec<Loan>> {
        self.store.list_loans().await
    }

    pub async fn loan_history(&self) -> AppResult<Vec<LoanHistoryEntry>> {
        self.store.loan_history().await
    }

    /// Active loans of a member; an unknown name yields an empty list
    pub async fn loans_by_member_name(&self, name: &str) -> AppResult<Vec<MemberLoan>> {
        self.store.active_loans_by_member(name).await
    }

    /// Record a loan for a known member. Fails when the collection is missing or out of stock.
    pub async fn create_loan(&self, loan: &CreateLoan) -> AppResult<i32> {
        self.store.create_loan(loan).await
    }

    /// Borrow one copy for the named member, registering the member on first borrow
    pub async fn borrow(
        &self,
        collection_id: i32,
        member_name: &str,
        loan_date: NaiveDate,
    ) -> AppResult<BorrowReceipt> {
        let due_date = due_date(loan_date, self.config.duration_days)
            .ok_or_else(|| AppError::Validation("loanDate out of range".to_string()))?;

        let member = self.members.find_or_create_by_name(member_name).await?;

        let loan = CreateLoan {
            collection_id,
            member_id: member.id,
            loan_date,
            due_date,
        };

        let loan_id = match self.create_loan(&loan).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    "Borrow of collection {} by \"{}\" refused: {}",
                    collection_id,
                    member_name,
                    e
                );
                return Err(e);
            }
        };

        tracing::info!(
            "Loan {} created: collection {} to member {} until {}",
            loan_id,
            collection_id,
            member.id,
            loan.due_date
        );

        Ok(BorrowReceipt { loan_id, due_date })
    }

    /// Return an active loan and put the copy back on the shelf
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let loan = self.store.return_loan(loan_id).await?;
        tracing::info!(
            "Loan {} returned, collection {} restocked",
            loan.id,
            loan.collection_id
        );
        Ok(loan)
    }
}
