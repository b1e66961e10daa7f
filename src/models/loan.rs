//! Loan (borrow) model and related types

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub collection_id: i32,
    pub member_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Null while the loan is active
    pub returned_date: Option<DateTime<Utc>>,
}

/// Loan joined with member name and collection title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanHistoryEntry {
    pub id: i32,
    pub member_name: String,
    pub book_title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<DateTime<Utc>>,
}

/// Active loan of a member, joined with the collection title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MemberLoan {
    pub id: i32,
    pub book_title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<DateTime<Utc>>,
    pub collection_id: i32,
}

/// Insert data for a new loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoan {
    pub collection_id: i32,
    pub member_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Outcome of a successful borrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub loan_id: i32,
    pub due_date: NaiveDate,
}

/// Due date for a loan starting on `loan_date`, `None` past the representable calendar
pub fn due_date(loan_date: NaiveDate, duration_days: u32) -> Option<NaiveDate> {
    loan_date.checked_add_days(Days::new(u64::from(duration_days)))
}
