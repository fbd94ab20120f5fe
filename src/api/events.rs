//! Event endpoints

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
    models::event::{CreateEvent, Event, EventQuery, EventRegistration, UpdateEvent},
    AppState,
};

use super::AuthenticatedUser;

/// Paginated events response
#[derive(Serialize, ToSchema)]
pub struct EventsListResponse {
    pub events: Vec<Event>,
    pub total: i64,
}

/// List published events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events list", body = EventsListResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<EventsListResponse>> {
    let (events, total) = state.services.events.list(&query).await?;
    Ok(Json(EventsListResponse { events, total }))
}

/// Event detail by slug
#[utoipa::path(
    get,
    path = "/events/{slug}",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.get(&slug).await?;
    Ok(Json(event))
}

/// Create an event (librarian)
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let event = state.services.events.create(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event (librarian)
#[utoipa::path(
    put,
    path = "/events/{slug}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Event slug")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event)
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(data): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    claims.require_librarian()?;
    let event = state.services.events.update(&slug, &data).await?;
    Ok(Json(event))
}

/// Register the authenticated member for an event
#[utoipa::path(
    post,
    path = "/events/{slug}/register",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 201, description = "Registered", body = EventRegistration),
        (status = 409, description = "Already registered", body = crate::error::ErrorResponse),
        (status = 422, description = "Event full or closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_for_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<(StatusCode, Json<EventRegistration>)> {
    let registration = state
        .services
        .events
        .register(&slug, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Withdraw the authenticated member's registration
#[utoipa::path(
    delete,
    path = "/events/{slug}/register",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 204, description = "Registration withdrawn")
    )
)]
pub async fn unregister_from_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.services.events.unregister(&slug, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Registrations for an event (librarian)
#[utoipa::path(
    get,
    path = "/events/{slug}/registrations",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Registrations", body = [EventRegistration])
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<EventRegistration>>> {
    claims.require_librarian()?;
    let registrations = state.services.events.registrations(&slug).await?;
    Ok(Json(registrations))
}

/// Mark a registration attended (librarian)
#[utoipa::path(
    post,
    path = "/registrations/{id}/attend",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Attendance recorded", body = EventRegistration)
    )
)]
pub async fn mark_attended(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EventRegistration>> {
    claims.require_librarian()?;
    let registration = state.services.events.mark_attended(id).await?;
    Ok(Json(registration))
}
