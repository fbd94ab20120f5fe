//! Blog endpoints

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
    models::post::{
        Category, Comment, CreateComment, CreatePost, Post, PostDetails, PostQuery, Tag,
        UpdatePost,
    },
    AppState,
};

use super::{AuthenticatedUser, MaybeUser};

/// Paginated posts response
#[derive(Serialize, ToSchema)]
pub struct PostsListResponse {
    pub posts: Vec<Post>,
    pub total: i64,
}

/// List published posts
#[utoipa::path(
    get,
    path = "/posts",
    tag = "blog",
    params(PostQuery),
    responses(
        (status = 200, description = "Posts list", body = PostsListResponse)
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<PostsListResponse>> {
    let (posts, total) = state.services.blog.list_posts(&query).await?;
    Ok(Json(PostsListResponse { posts, total }))
}

/// Post detail by slug
#[utoipa::path(
    get,
    path = "/posts/{slug}",
    tag = "blog",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = PostDetails),
        (status = 404, description = "Post not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<Json<PostDetails>> {
    let user_id = claims.map(|c| c.user_id);
    let post = state.services.blog.get_post(&slug, user_id).await?;
    Ok(Json(post))
}

/// Publish a post (librarian)
#[utoipa::path(
    post,
    path = "/posts",
    tag = "blog",
    security(("bearer_auth" = [])),
    request_body = CreatePost,
    responses(
        (status = 201, description = "Post created", body = Post)
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    claims.require_librarian()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let post = state.services.blog.create_post(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post (librarian)
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "blog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePost,
    responses(
        (status = 200, description = "Post updated", body = Post)
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdatePost>,
) -> AppResult<Json<Post>> {
    claims.require_librarian()?;
    let post = state.services.blog.update_post(id, &data).await?;
    Ok(Json(post))
}

/// Delete a post (librarian)
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "blog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_librarian()?;
    state.services.blog.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/posts/{slug}/comments",
    tag = "blog",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Post slug")),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment added", body = Comment)
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(data): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let comment = state
        .services
        .blog
        .add_comment(&slug, claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Approve a comment (librarian moderation)
#[utoipa::path(
    post,
    path = "/comments/{id}/approve",
    tag = "blog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment approved", body = Comment),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_comment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Comment>> {
    claims.require_librarian()?;
    let comment = state.services.blog.approve_comment(id).await?;
    Ok(Json(comment))
}

/// Hide a comment (librarian moderation)
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "blog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment hidden")
    )
)]
pub async fn reject_comment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_librarian()?;
    state.services.blog.reject_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Active categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "blog",
    responses(
        (status = 200, description = "Categories", body = [Category])
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.blog.list_categories().await?;
    Ok(Json(categories))
}

/// All tags
#[utoipa::path(
    get,
    path = "/tags",
    tag = "blog",
    responses(
        (status = 200, description = "Tags", body = [Tag])
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = state.services.blog.list_tags().await?;
    Ok(Json(tags))
}
