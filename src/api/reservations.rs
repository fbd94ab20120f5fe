//! Circulation endpoints: reservations

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
        enums::ReservationStatus,
        reservation::{Reservation, ReservationDetails, ReserveResponse},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated reservations response
#[derive(Serialize, ToSchema)]
pub struct ReservationsListResponse {
    pub reservations: Vec<ReservationDetails>,
    pub total: i64,
}

/// Reservation list query parameters
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// List reservations (librarian)
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations list", body = ReservationsListResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<ReservationsListResponse>> {
    claims.require_librarian()?;
    let (reservations, total) = state
        .services
        .circulation
        .list_reservations(
            query.status,
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(20),
        )
        .await?;
    Ok(Json(ReservationsListResponse {
        reservations,
        total,
    }))
}

/// Reserve a book for the authenticated member
#[utoipa::path(
    post,
    path = "/books/{id}/reserve",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 201, description = "Reservation placed", body = ReserveResponse),
        (status = 409, description = "Already reserved", body = crate::error::ErrorResponse),
        (status = 422, description = "Copies available", body = crate::error::ErrorResponse)
    )
)]
pub async fn reserve_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<ReserveResponse>)> {
    let response = state.services.circulation.reserve(claims.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Cancel a reservation. Members cancel their own; librarians any.
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation)
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .services
        .circulation
        .cancel_reservation(&claims, id)
        .await?;
    Ok(Json(reservation))
}

/// Mark a reservation fulfilled (librarian)
#[utoipa::path(
    post,
    path = "/reservations/{id}/fulfill",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation fulfilled", body = Reservation)
    )
)]
pub async fn fulfill_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    claims.require_librarian()?;
    let reservation = state.services.circulation.fulfill_reservation(id).await?;
    Ok(Json(reservation))
}

/// Expire stale pickup holds and free their copies (librarian)
#[utoipa::path(
    post,
    path = "/reservations/expire-stale",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expired reservations", body = [Reservation])
    )
)]
pub async fn expire_stale(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Reservation>>> {
    claims.require_librarian()?;
    let expired = state.services.circulation.expire_reservations().await?;
    Ok(Json(expired))
}
