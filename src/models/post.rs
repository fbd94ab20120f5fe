//! Blog models: posts, categories, tags, comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Derive a URL slug from a title: lowercase alphanumerics joined by
/// single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Blog post category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Blog post tag
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Blog / news post
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub content: String,
    pub excerpt: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    /// Set automatically the first time the post is published
    pub published_date: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post with joined author name and tags for the detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    pub author_name: String,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentDetails>,
    pub related_posts: Vec<Post>,
}

/// Blog post comment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Comment with author name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentDetails {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub author_name: String,
    pub parent_id: Option<i32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Create post request (librarian)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePost {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Slug (auto-derived from the title when absent)
    pub slug: Option<String>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub excerpt: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Update post request (librarian)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Query parameters for the post list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PostQuery {
    /// Filter by category slug
    pub category: Option<String>,
    /// Filter by tag slug
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation_and_whitespace() {
        assert_eq!(slugify("Library Week 2025!"), "library-week-2025");
        assert_eq!(slugify("  New -- Arrivals  "), "new-arrivals");
        assert_eq!(slugify("Déjà Vu"), "déjà-vu");
        assert_eq!(slugify("---"), "");
    }
}
