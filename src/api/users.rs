//! User administration and staff directory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{StaffMember, UpdateUser, User, UserQuery},
    AppState,
};

use super::AuthenticatedUser;

/// Paginated users response
#[derive(Serialize, ToSchema)]
pub struct UsersListResponse {
    pub users: Vec<User>,
    pub total: i64,
}

/// List members (librarian)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "Users list", body = UsersListResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<UsersListResponse>> {
    claims.require_librarian()?;
    let (users, total) = state.services.auth.list_users(&query).await?;
    Ok(Json(UsersListResponse { users, total }))
}

/// Get a member by ID (librarian)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_librarian()?;
    let user = state.services.auth.get_user(id).await?;
    Ok(Json(user))
}

/// Update a member account (librarian)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    // Only admins can grant or revoke privileges
    if (data.is_librarian.is_some() || data.is_staff_member.is_some()) && !claims.is_admin() {
        return Err(AppError::Authorization(
            "Only administrators can change privileges".to_string(),
        ));
    }
    let user = state.services.auth.update_user(id, &data).await?;
    Ok(Json(user))
}

/// Deactivate a member account (admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated")
    )
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    if !claims.is_admin() {
        return Err(AppError::Authorization(
            "Administrator privileges required".to_string(),
        ));
    }
    state.services.auth.deactivate_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public staff directory
#[utoipa::path(
    get,
    path = "/staff",
    tag = "users",
    responses(
        (status = 200, description = "Staff directory", body = [StaffMember])
    )
)]
pub async fn list_staff(State(state): State<AppState>) -> AppResult<Json<Vec<StaffMember>>> {
    let staff = state.services.auth.list_staff().await?;
    Ok(Json(staff))
}
