//! Statistics and analytics endpoints (librarian)

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::activity::{ActivityQuery, UserActivity},
    repository::stats::{LibraryStats, PopularBook},
    AppState,
};

use super::AuthenticatedUser;

/// Reporting window parameters
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// Window in days (default 30)
    pub days: Option<i64>,
    /// Maximum rows (default 10)
    pub limit: Option<i64>,
}

/// Paginated activity response
#[derive(Serialize, ToSchema)]
pub struct ActivityListResponse {
    pub activities: Vec<UserActivity>,
    pub total: i64,
}

/// A recurring search term and its frequency
#[derive(Serialize, ToSchema)]
pub struct TopSearch {
    pub query: String,
    pub count: i64,
}

/// Library-wide counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library statistics", body = LibraryStats)
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LibraryStats>> {
    claims.require_staff()?;
    let stats = state.services.analytics.library_stats().await?;
    Ok(Json(stats))
}

/// Most-borrowed books
#[utoipa::path(
    get,
    path = "/stats/popular-books",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Popular books", body = [PopularBook])
    )
)]
pub async fn popular_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<PopularBook>>> {
    claims.require_librarian()?;
    let books = state
        .services
        .analytics
        .popular_books(query.days.unwrap_or(30), query.limit.unwrap_or(10))
        .await?;
    Ok(Json(books))
}

/// Most frequent search terms
#[utoipa::path(
    get,
    path = "/stats/top-searches",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Top searches", body = [TopSearch])
    )
)]
pub async fn top_searches(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<TopSearch>>> {
    claims.require_librarian()?;
    let searches = state
        .services
        .analytics
        .top_searches(query.days.unwrap_or(30), query.limit.unwrap_or(10))
        .await?;
    Ok(Json(
        searches
            .into_iter()
            .map(|(query, count)| TopSearch { query, count })
            .collect(),
    ))
}

/// Activity feed
#[utoipa::path(
    get,
    path = "/stats/activity",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activity feed", body = ActivityListResponse)
    )
)]
pub async fn activity_feed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<ActivityListResponse>> {
    claims.require_librarian()?;
    let (activities, total) = state.services.analytics.activity_feed(&query).await?;
    Ok(Json(ActivityListResponse { activities, total }))
}
