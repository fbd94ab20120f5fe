//! Authentication and member account endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::Fine,
        loan::LoanDetails,
        reservation::ReservationDetails,
        user::{Profile, RegisterUser, UpdateProfile, User},
    },
    services::auth::{Dashboard, LoginResponse},
    AppState,
};

use super::AuthenticatedUser;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Register a new member account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 409, description = "Username or email already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let response = state.services.auth.register(&data).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .auth
        .login(&data.username, &data.password)
        .await?;
    Ok(Json(response))
}

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.auth.get_user(claims.user_id).await?;
    Ok(Json(user))
}

/// Member dashboard counters
#[utoipa::path(
    get,
    path = "/auth/dashboard",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = Dashboard)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Dashboard>> {
    let dashboard = state.services.auth.dashboard(claims.user_id).await?;
    Ok(Json(dashboard))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = Profile)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.auth.get_profile(claims.user_id).await?;
    Ok(Json(profile))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = Profile)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .auth
        .update_profile(claims.user_id, &data)
        .await?;
    Ok(Json(profile))
}

/// The authenticated user's loans
#[utoipa::path(
    get,
    path = "/auth/loans",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loan history", body = [LoanDetails])
    )
)]
pub async fn my_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.circulation.user_loans(claims.user_id).await?;
    Ok(Json(loans))
}

/// The authenticated user's reservations
#[utoipa::path(
    get,
    path = "/auth/reservations",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservations", body = [ReservationDetails])
    )
)]
pub async fn my_reservations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    let reservations = state
        .services
        .circulation
        .user_reservations(claims.user_id)
        .await?;
    Ok(Json(reservations))
}

/// The authenticated user's fines
#[utoipa::path(
    get,
    path = "/auth/fines",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fines", body = [Fine])
    )
)]
pub async fn my_fines(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.circulation.user_fines(claims.user_id).await?;
    Ok(Json(fines))
}
