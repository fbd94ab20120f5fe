//! Blog repository: posts, categories, tags, comments

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::post::{
        slugify, Category, Comment, CommentDetails, CreateComment, CreatePost, Post, PostDetails,
        PostQuery, Tag, UpdatePost,
    },
};

#[derive(Clone)]
pub struct PostsRepository {
    pool: Pool<Postgres>,
}

impl PostsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Published post by slug, with author, tags, approved comments and
    /// related posts from the same category. Bumps the view counter.
    pub async fn get_details_by_slug(&self, slug: &str) -> AppResult<PostDetails> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET view_count = view_count + 1
            WHERE slug = $1 AND is_published
            RETURNING *
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", slug)))?;

        let author_name: String = sqlx::query_scalar(
            "SELECT TRIM(CONCAT(first_name, ' ', last_name)) FROM users WHERE id = $1",
        )
        .bind(post.author_id)
        .fetch_one(&self.pool)
        .await?;

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.* FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post.id)
        .fetch_all(&self.pool)
        .await?;

        let comments = sqlx::query_as::<_, CommentDetails>(
            r#"
            SELECT c.id, c.post_id, c.author_id,
                   TRIM(CONCAT(u.first_name, ' ', u.last_name)) AS author_name,
                   c.parent_id, c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1 AND c.is_approved
            ORDER BY c.created_at
            "#,
        )
        .bind(post.id)
        .fetch_all(&self.pool)
        .await?;

        let related_posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE is_published AND id <> $1
              AND category_id IS NOT DISTINCT FROM $2
            ORDER BY published_date DESC
            LIMIT 3
            "#,
        )
        .bind(post.id)
        .bind(post.category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PostDetails {
            post,
            author_name,
            tags,
            comments,
            related_posts,
        })
    }

    /// Published posts, newest first, with category/tag filters
    pub async fn list(&self, query: &PostQuery) -> AppResult<(Vec<Post>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["p.is_published".to_string()];
        let mut idx = 1;
        if query.category.is_some() {
            conditions.push(format!(
                "p.category_id = (SELECT id FROM categories WHERE slug = ${})",
                idx
            ));
            idx += 1;
        }
        if query.tag.is_some() {
            conditions.push(format!(
                r#"EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
                           WHERE pt.post_id = p.id AND t.slug = ${})"#,
                idx
            ));
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM posts p WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref c) = query.category {
            count_builder = count_builder.bind(c);
        }
        if let Some(ref t) = query.tag {
            count_builder = count_builder.bind(t);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT p.* FROM posts p WHERE {} ORDER BY p.published_date DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Post>(&select_q);
        if let Some(ref c) = query.category {
            builder = builder.bind(c);
        }
        if let Some(ref t) = query.tag {
            builder = builder.bind(t);
        }
        let posts = builder.fetch_all(&self.pool).await?;

        Ok((posts, total))
    }

    /// Create a post. The slug is derived from the title when absent and a
    /// numeric suffix is appended on collision.
    pub async fn create(&self, author_id: i32, data: &CreatePost) -> AppResult<Post> {
        let mut tx = self.pool.begin().await?;

        let base = data
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&data.title));
        let mut slug = base.clone();
        let mut suffix = 2;
        loop {
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
                    .bind(&slug)
                    .fetch_one(&mut *tx)
                    .await?;
            if !taken {
                break;
            }
            slug = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        let is_published = data.is_published.unwrap_or(false);
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, slug, author_id, category_id, content, excerpt,
                               is_published, is_featured, published_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    CASE WHEN $7 THEN NOW() ELSE NULL END)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&slug)
        .bind(author_id)
        .bind(data.category_id)
        .bind(&data.content)
        .bind(&data.excerpt)
        .bind(is_published)
        .bind(data.is_featured.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref tag_ids) = data.tag_ids {
            for tag_id in tag_ids {
                sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                    .bind(post.id)
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(post)
    }

    pub async fn update(&self, id: i32, data: &UpdatePost) -> AppResult<Post> {
        let current = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;

        let mut tx = self.pool.begin().await?;

        let is_published = data.is_published.unwrap_or(current.is_published);
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET
                title = $2, category_id = $3, content = $4, excerpt = $5,
                is_published = $6, is_featured = $7,
                published_date = CASE
                    WHEN $6 AND published_date IS NULL THEN NOW()
                    ELSE published_date
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.title.as_deref().unwrap_or(&current.title))
        .bind(data.category_id.or(current.category_id))
        .bind(data.content.as_deref().unwrap_or(&current.content))
        .bind(data.excerpt.as_ref().or(current.excerpt.as_ref()))
        .bind(is_published)
        .bind(data.is_featured.unwrap_or(current.is_featured))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref tag_ids) = data.tag_ids {
            sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for tag_id in tag_ids {
                sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(post)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }
        Ok(())
    }

    /// Add a comment to a published post. Comments start unapproved and
    /// only appear on the post once a librarian approves them.
    pub async fn create_comment(
        &self,
        post_slug: &str,
        author_id: i32,
        data: &CreateComment,
    ) -> AppResult<Comment> {
        let post_id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM posts WHERE slug = $1 AND is_published")
                .bind(post_slug)
                .fetch_optional(&self.pool)
                .await?;
        let post_id = post_id
            .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", post_slug)))?;

        if let Some(parent_id) = data.parent_id {
            let parent_ok: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND post_id = $2)",
            )
            .bind(parent_id)
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
            if !parent_ok {
                return Err(AppError::BadRequest(
                    "Parent comment does not belong to this post".to_string(),
                ));
            }
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, parent_id, content, is_approved)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(data.parent_id)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    /// Approve a comment so it shows up on the post
    pub async fn approve_comment(&self, id: i32) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET is_approved = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    /// Hide a comment (librarian moderation)
    pub async fn reject_comment(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE comments SET is_approved = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Comment with id {} not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }
}
