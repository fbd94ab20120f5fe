//! Institutional repository service
//!
//! Listings expose metadata for every approved document; the access level
//! gates the file itself, checked against the caller at download time.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        activity::NewActivity,
        document::{Collection, CreateDocument, Document, DocumentQuery, ReviewDocument},
        enums::{ActionType, SearchType},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DocumentsService {
    repository: Repository,
}

impl DocumentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search(
        &self,
        query: &DocumentQuery,
        user_id: Option<i32>,
    ) -> AppResult<(Vec<Document>, i64)> {
        let (documents, total) = self.repository.documents.list(query).await?;

        if let Some(ref q) = query.q {
            let filters = serde_json::json!({
                "type": query.document_type,
                "collection": query.collection,
                "department": query.department,
                "year": query.year,
            });
            self.repository
                .activity
                .record_search(q, user_id, total, SearchType::Repository, filters)
                .await?;
        }

        Ok((documents, total))
    }

    /// Document detail view. Enforces the access level, bumps the view
    /// counter and records the view.
    pub async fn get_document(&self, id: i32, user: Option<&UserClaims>) -> AppResult<Document> {
        let document = self.repository.documents.get_by_id(id).await?;
        if !document.is_approved {
            // Unreviewed submissions are visible to the submitter and staff
            let allowed = user.map_or(false, |u| {
                Some(u.user_id) == document.submitted_by || u.require_staff().is_ok()
            });
            if !allowed {
                return Err(AppError::NotFound(format!(
                    "Document with id {} not found",
                    id
                )));
            }
        } else if !document.is_accessible(user, Utc::now().date_naive()) {
            return Err(AppError::Authorization(
                "You do not have access to this document".to_string(),
            ));
        }

        self.repository.documents.increment_views(id).await?;
        self.repository
            .activity
            .record(&NewActivity::new(
                user.map(|u| u.user_id),
                ActionType::ViewDocument,
                format!("Viewed document '{}'", document.title),
            ))
            .await?;
        Ok(document)
    }

    /// Resolve the file path for a download, enforcing the access level
    pub async fn download(&self, id: i32, user: Option<&UserClaims>) -> AppResult<String> {
        let document = self.repository.documents.get_by_id(id).await?;
        if !document.is_approved {
            return Err(AppError::NotFound(format!(
                "Document with id {} not found",
                id
            )));
        }
        if !document.is_accessible(user, Utc::now().date_naive()) {
            return Err(AppError::Authorization(
                "You do not have access to this document".to_string(),
            ));
        }

        self.repository.documents.increment_downloads(id).await?;
        self.repository
            .activity
            .record(&NewActivity::new(
                user.map(|u| u.user_id),
                ActionType::Download,
                format!("Downloaded document '{}'", document.title),
            ))
            .await?;
        Ok(document.file_path)
    }

    pub async fn submit(&self, submitted_by: i32, data: &CreateDocument) -> AppResult<Document> {
        self.repository.documents.create(submitted_by, data).await
    }

    pub async fn review(
        &self,
        id: i32,
        reviewed_by: i32,
        data: &ReviewDocument,
    ) -> AppResult<Document> {
        self.repository.documents.review(id, reviewed_by, data).await
    }

    pub async fn pending_review(&self) -> AppResult<Vec<Document>> {
        self.repository.documents.list_pending_review().await
    }

    pub async fn list_collections(&self) -> AppResult<Vec<Collection>> {
        self.repository.documents.list_collections().await
    }
}
