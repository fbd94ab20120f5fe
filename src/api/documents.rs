//! Institutional repository endpoints

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
    models::document::{Collection, CreateDocument, Document, DocumentQuery, ReviewDocument},
    AppState,
};

use super::{AuthenticatedUser, MaybeUser};

/// Paginated documents response
#[derive(Serialize, ToSchema)]
pub struct DocumentsListResponse {
    pub documents: Vec<Document>,
    pub total: i64,
}

/// Download link for an accessible document
#[derive(Serialize, ToSchema)]
pub struct DownloadResponse {
    pub file_path: String,
}

/// Search the institutional repository
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    params(DocumentQuery),
    responses(
        (status = 200, description = "Documents list", body = DocumentsListResponse)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Query(query): Query<DocumentQuery>,
) -> AppResult<Json<DocumentsListResponse>> {
    let user_id = claims.map(|c| c.user_id);
    let (documents, total) = state.services.documents.search(&query, user_id).await?;
    Ok(Json(DocumentsListResponse { documents, total }))
}

/// Document detail
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = Document),
        (status = 404, description = "Document not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Document>> {
    let document = state
        .services
        .documents
        .get_document(id, claims.as_ref())
        .await?;
    Ok(Json(document))
}

/// Resolve the download for a document, enforcing its access level
#[utoipa::path(
    get,
    path = "/documents/{id}/download",
    tag = "documents",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Download link", body = DownloadResponse),
        (status = 403, description = "Access denied", body = crate::error::ErrorResponse)
    )
)]
pub async fn download_document(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DownloadResponse>> {
    let file_path = state
        .services
        .documents
        .download(id, claims.as_ref())
        .await?;
    Ok(Json(DownloadResponse { file_path }))
}

/// Submit a document for review
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    security(("bearer_auth" = [])),
    request_body = CreateDocument,
    responses(
        (status = 201, description = "Document submitted", body = Document)
    )
)]
pub async fn submit_document(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<Document>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let document = state
        .services
        .documents
        .submit(claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Submissions waiting for review (librarian)
#[utoipa::path(
    get,
    path = "/documents/pending",
    tag = "documents",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending submissions", body = [Document])
    )
)]
pub async fn pending_documents(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Document>>> {
    claims.require_librarian()?;
    let documents = state.services.documents.pending_review().await?;
    Ok(Json(documents))
}

/// Approve or reject a submission (librarian)
#[utoipa::path(
    post,
    path = "/documents/{id}/review",
    tag = "documents",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Document ID")),
    request_body = ReviewDocument,
    responses(
        (status = 200, description = "Document reviewed", body = Document)
    )
)]
pub async fn review_document(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReviewDocument>,
) -> AppResult<Json<Document>> {
    claims.require_librarian()?;
    let document = state
        .services
        .documents
        .review(id, claims.user_id, &data)
        .await?;
    Ok(Json(document))
}

/// Active collections
#[utoipa::path(
    get,
    path = "/collections",
    tag = "documents",
    responses(
        (status = 200, description = "Collections", body = [Collection])
    )
)]
pub async fn list_collections(State(state): State<AppState>) -> AppResult<Json<Vec<Collection>>> {
    let collections = state.services.documents.list_collections().await?;
    Ok(Json(collections))
}
