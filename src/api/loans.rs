//! Circulation endpoints: loans

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        fine::Fine,
        loan::{CreateLoan, Loan, LoanDetails, LoanQuery},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated loans response
#[derive(Serialize, ToSchema)]
pub struct LoansListResponse {
    pub loans: Vec<LoanDetails>,
    pub total: i64,
}

/// Outcome of returning a loan
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub loan: Loan,
    pub days_late: i64,
    pub fine: Option<Fine>,
    /// Whether the copy was held for the next reservation in the queue
    pub held_for_reservation: bool,
}

/// Result of the bulk overdue sweep
#[derive(Serialize, ToSchema)]
pub struct OverdueSweepResponse {
    pub flipped: u64,
}

/// List loans (librarian)
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans list", body = LoansListResponse)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<LoansListResponse>> {
    claims.require_librarian()?;
    let (loans, total) = state.services.circulation.list_loans(&query).await?;
    Ok(Json(LoansListResponse { loans, total }))
}

/// Check out a copy to a member (librarian)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 422, description = "Copy not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    claims.require_librarian()?;
    let loan = state
        .services
        .circulation
        .checkout(claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a loan (librarian)
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned", body = ReturnResponse),
        (status = 422, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    claims.require_librarian()?;
    let outcome = state
        .services
        .circulation
        .return_loan(claims.user_id, id)
        .await?;
    Ok(Json(ReturnResponse {
        held_for_reservation: outcome.promoted.is_some(),
        loan: outcome.loan,
        days_late: outcome.days_late,
        fine: outcome.fine,
    }))
}

/// Renew a loan. Members renew their own loans; librarians any.
#[utoipa::path(
    post,
    path = "/loans/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan renewed", body = Loan),
        (status = 422, description = "Renewal not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.circulation.renew(&claims, id).await?;
    Ok(Json(loan))
}

/// Mark a loan and its copy as lost (librarian)
#[utoipa::path(
    post,
    path = "/loans/{id}/lost",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan marked lost", body = Loan)
    )
)]
pub async fn mark_lost(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    claims.require_librarian()?;
    let loan = state.services.circulation.mark_lost(id).await?;
    Ok(Json(loan))
}

/// Flip all active past-due loans to overdue (librarian)
#[utoipa::path(
    post,
    path = "/loans/refresh-overdue",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sweep completed", body = OverdueSweepResponse)
    )
)]
pub async fn refresh_overdue(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<OverdueSweepResponse>> {
    claims.require_librarian()?;
    let flipped = state.services.circulation.refresh_overdue().await?;
    Ok(Json(OverdueSweepResponse { flipped }))
}

/// A member's loans (librarian)
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Loan history", body = [LoanDetails])
    )
)]
pub async fn get_user_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_librarian()?;
    let loans = state.services.circulation.user_loans(id).await?;
    Ok(Json(loans))
}
