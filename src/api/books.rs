//! Catalog endpoints: books, copies, authors, genres, publishers

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
    models::{
        book::{
            Author, AuthorDetails, Book, BookDetails, BookQuery, CreateAuthor, CreateBook,
            CreateCopy, CreateGenre, CreatePublisher, Genre, GenreDetails, Publisher, UpdateBook,
            UpdateCopy,
        },
        Copy,
    },
    AppState,
};

use super::{AuthenticatedUser, MaybeUser};

/// Paginated books response
#[derive(Serialize, ToSchema)]
pub struct BooksListResponse {
    pub books: Vec<Book>,
    pub total: i64,
}

/// Search the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books list", body = BooksListResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BooksListResponse>> {
    let user_id = claims.map(|c| c.user_id);
    let (books, total) = state.services.catalog.search(&query, user_id).await?;
    Ok(Json(BooksListResponse { books, total }))
}

/// Book detail with authors and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let user_id = claims.map(|c| c.user_id);
    let book = state.services.catalog.get_book(id, user_id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog (librarian)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let book = state.services.catalog.create_book(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book (librarian)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_librarian()?;
    let book = state.services.catalog.update_book(id, &data).await?;
    Ok(Json(book))
}

/// Retire a book from the catalog (librarian)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book retired")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_librarian()?;
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a physical copy (librarian)
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = Copy)
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<Copy>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let copy = state.services.catalog.add_copy(id, &data).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Update a copy's status or location (librarian)
#[utoipa::path(
    put,
    path = "/copies/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Copy ID")),
    request_body = UpdateCopy,
    responses(
        (status = 200, description = "Copy updated", body = Copy)
    )
)]
pub async fn update_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateCopy>,
) -> AppResult<Json<Copy>> {
    claims.require_librarian()?;
    let copy = state.services.catalog.update_copy(id, &data).await?;
    Ok(Json(copy))
}

/// Remove a copy (librarian). Refused when the copy has loan history.
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 422, description = "Copy has loan history", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_librarian()?;
    state.services.catalog.delete_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "books",
    responses(
        (status = 200, description = "Authors list", body = [Author])
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Add an author (librarian)
#[utoipa::path(
    post,
    path = "/authors",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let author = state.services.catalog.create_author(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Author with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "books",
    responses(
        (status = 200, description = "Genres list", body = [Genre])
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Add a genre (librarian)
#[utoipa::path(
    post,
    path = "/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let genre = state.services.catalog.create_genre(&data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Genre with its active books
#[utoipa::path(
    get,
    path = "/genres/{slug}",
    tag = "books",
    params(("slug" = String, Path, description = "Genre slug")),
    responses(
        (status = 200, description = "Genre details", body = GenreDetails),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<GenreDetails>> {
    let genre = state.services.catalog.get_genre(&slug).await?;
    Ok(Json(genre))
}

/// List all publishers
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "books",
    responses(
        (status = 200, description = "Publishers list", body = [Publisher])
    )
)]
pub async fn list_publishers(State(state): State<AppState>) -> AppResult<Json<Vec<Publisher>>> {
    let publishers = state.services.catalog.list_publishers().await?;
    Ok(Json(publishers))
}

/// Add a publisher (librarian)
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreatePublisher,
    responses(
        (status = 201, description = "Publisher created", body = Publisher)
    )
)]
pub async fn create_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreatePublisher>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let publisher = state.services.catalog.create_publisher(&data).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}
