//! Circulation endpoints: fines

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        enums::FineStatus,
        fine::{CreateFine, Fine, PayFine, WaiveFine},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated fines response
#[derive(Serialize, ToSchema)]
pub struct FinesListResponse {
    pub fines: Vec<Fine>,
    pub total: i64,
}

/// Fine list query parameters
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct FineQuery {
    pub status: Option<FineStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// List fines (librarian)
#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(FineQuery),
    responses(
        (status = 200, description = "Fines list", body = FinesListResponse)
    )
)]
pub async fn list_fines(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<FineQuery>,
) -> AppResult<Json<FinesListResponse>> {
    claims.require_librarian()?;
    let (fines, total) = state
        .services
        .circulation
        .list_fines(
            query.status,
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(20),
        )
        .await?;
    Ok(Json(FinesListResponse { fines, total }))
}

/// Record a manual fine (librarian)
#[utoipa::path(
    post,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    request_body = CreateFine,
    responses(
        (status = 201, description = "Fine created", body = Fine)
    )
)]
pub async fn create_fine(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateFine>,
) -> AppResult<(StatusCode, Json<Fine>)> {
    claims.require_librarian()?;
    let fine = state.services.circulation.create_fine(&data).await?;
    Ok((StatusCode::CREATED, Json(fine)))
}

/// Record a fine payment (librarian, at the desk)
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Fine ID")),
    request_body = PayFine,
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 422, description = "Fine is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_fine(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<PayFine>,
) -> AppResult<Json<Fine>> {
    claims.require_librarian()?;
    let fine = state.services.circulation.pay_fine(id, &data).await?;
    Ok(Json(fine))
}

/// Waive a fine (librarian)
#[utoipa::path(
    post,
    path = "/fines/{id}/waive",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Fine ID")),
    request_body = WaiveFine,
    responses(
        (status = 200, description = "Fine waived", body = Fine),
        (status = 422, description = "Fine is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn waive_fine(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<WaiveFine>,
) -> AppResult<Json<Fine>> {
    claims.require_librarian()?;
    let fine = state
        .services
        .circulation
        .waive_fine(id, claims.user_id, &data)
        .await?;
    Ok(Json(fine))
}
