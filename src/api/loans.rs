//! Loan management endpoints

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanHistoryEntry, MemberLoan},
    AppState,
};

use super::{collections::MessageResponse, ApiJson, ApiPath, ApiQuery};

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Collection to borrow from
    #[validate(
        required(message = "collectionId is required"),
        range(min = 1, message = "collectionId must be positive")
    )]
    pub collection_id: Option<i32>,
    /// Borrower name; the member is registered on first borrow
    #[validate(
        required(message = "memberName is required"),
        length(min = 1, message = "memberName is required")
    )]
    pub member_name: Option<String>,
    /// Loan start date (YYYY-MM-DD)
    #[validate(required(message = "loanDate is required"))]
    pub loan_date: Option<NaiveDate>,
}

impl BorrowRequest {
    /// Validated fields, or a validation error naming what is missing
    fn into_parts(self) -> AppResult<(i32, String, NaiveDate)> {
        self.validate()?;
        match (self.collection_id, self.member_name, self.loan_date) {
            (Some(collection_id), Some(member_name), Some(loan_date)) => {
                Ok((collection_id, member_name, loan_date))
            }
            _ => Err(AppError::Validation(
                "collectionId, memberName and loanDate are required".to_string(),
            )),
        }
    }
}

/// Borrow response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowResponse {
    pub message: String,
    pub loan_id: i32,
    pub due_date: NaiveDate,
}

/// Return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    #[validate(required(message = "loanId is required"))]
    pub loan_id: Option<i32>,
}

/// Member loans query
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberLoansQuery {
    /// Exact member name
    #[validate(required(message = "name is required"))]
    pub name: Option<String>,
}

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans", body = Vec<Loan>),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_loans(State(state): State<AppState>) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan", body = Loan),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Borrow one copy of a collection
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Loan created", body = BorrowResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Collection not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copies available", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BorrowRequest>,
) -> AppResult<Json<BorrowResponse>> {
    let (collection_id, member_name, loan_date) = request.into_parts()?;

    let receipt = state
        .services
        .loans
        .borrow(collection_id, &member_name, loan_date)
        .await?;

    Ok(Json(BorrowResponse {
        message: "Loan created".to_string(),
        loan_id: receipt.loan_id,
        due_date: receipt.due_date,
    }))
}

/// Return a borrowed copy
#[utoipa::path(
    post,
    path = "/return",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = MessageResponse),
        (status = 400, description = "Missing loanId", body = crate::error::ErrorResponse),
        (status = 404, description = "Loan not found or already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReturnRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate()?;
    let loan_id = request
        .loan_id
        .ok_or_else(|| AppError::Validation("loanId is required".to_string()))?;

    state.services.loans.return_loan(loan_id).await?;

    Ok(Json(MessageResponse {
        message: "Book returned".to_string(),
    }))
}

/// All loans with member name and collection title
#[utoipa::path(
    get,
    path = "/loan-history",
    tag = "loans",
    responses(
        (status = 200, description = "Loan history", body = Vec<LoanHistoryEntry>),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn loan_history(State(state): State<AppState>) -> AppResult<Json<Vec<LoanHistoryEntry>>> {
    let history = state.services.loans.loan_history().await?;
    Ok(Json(history))
}

/// Active loans of a member
#[utoipa::path(
    get,
    path = "/loans-by-member",
    tag = "loans",
    params(MemberLoansQuery),
    responses(
        (status = 200, description = "Active loans, possibly empty", body = Vec<MemberLoan>),
        (status = 400, description = "Missing name", body = crate::error::ErrorResponse)
    )
)]
pub async fn loans_by_member(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MemberLoansQuery>,
) -> AppResult<Json<Vec<MemberLoan>>> {
    query.validate()?;
    let name = query
        .name
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;

    let loans = state.services.loans.loans_by_member_name(&name).await?;
    Ok(Json(loans))
}
