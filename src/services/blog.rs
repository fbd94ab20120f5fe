//! Blog service

use crate::{
    error::AppResult,
    models::{
        activity::NewActivity,
        enums::ActionType,
        post::{
            Category, Comment, CreateComment, CreatePost, Post, PostDetails, PostQuery, Tag,
            UpdatePost,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BlogService {
    repository: Repository,
}

impl BlogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_posts(&self, query: &PostQuery) -> AppResult<(Vec<Post>, i64)> {
        self.repository.posts.list(query).await
    }

    /// Post detail view. Records a view activity for signed-in callers.
    pub async fn get_post(&self, slug: &str, user_id: Option<i32>) -> AppResult<PostDetails> {
        let details = self.repository.posts.get_details_by_slug(slug).await?;

        if let Some(user_id) = user_id {
            // The activity log has no separate action for post views
            self.repository
                .activity
                .record(&NewActivity::new(
                    Some(user_id),
                    ActionType::ViewBook,
                    format!("Viewed post '{}'", details.post.title),
                ))
                .await?;
        }

        Ok(details)
    }

    pub async fn create_post(&self, author_id: i32, data: &CreatePost) -> AppResult<Post> {
        self.repository.posts.create(author_id, data).await
    }

    pub async fn update_post(&self, id: i32, data: &UpdatePost) -> AppResult<Post> {
        self.repository.posts.update(id, data).await
    }

    pub async fn delete_post(&self, id: i32) -> AppResult<()> {
        self.repository.posts.delete(id).await
    }

    pub async fn add_comment(
        &self,
        post_slug: &str,
        author_id: i32,
        data: &CreateComment,
    ) -> AppResult<Comment> {
        let comment = self
            .repository
            .posts
            .create_comment(post_slug, author_id, data)
            .await?;

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(author_id),
                ActionType::Comment,
                format!("Commented on post '{}'", post_slug),
            ))
            .await?;

        Ok(comment)
    }

    pub async fn approve_comment(&self, id: i32) -> AppResult<Comment> {
        self.repository.posts.approve_comment(id).await
    }

    pub async fn reject_comment(&self, id: i32) -> AppResult<()> {
        self.repository.posts.reject_comment(id).await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.posts.list_categories().await
    }

    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        self.repository.posts.list_tags().await
    }
}
