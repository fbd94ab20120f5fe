//! Institutional repository: documents and collections

use chrono::Datelike;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{Collection, CreateDocument, Document, DocumentQuery, ReviewDocument},
        enums::AccessLevel,
    },
};

#[derive(Clone)]
pub struct DocumentsRepository {
    pool: Pool<Postgres>,
}

impl DocumentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1 AND is_active")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document with id {} not found", id)))
    }

    /// Search approved documents with pagination. Access-level gating is
    /// applied per-row by the caller, which knows who is asking.
    pub async fn list(&self, query: &DocumentQuery) -> AppResult<(Vec<Document>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let pattern = query.q.as_ref().map(|q| format!("%{}%", q));

        let mut conditions = vec!["d.is_active".to_string(), "d.is_approved".to_string()];
        let mut idx = 1;
        if pattern.is_some() {
            conditions.push(format!(
                r#"(d.title ILIKE ${idx} OR d.author ILIKE ${idx} OR d.abstract_text ILIKE ${idx}
                    OR d.keywords ILIKE ${idx} OR d.subject ILIKE ${idx})"#
            ));
            idx += 1;
        }
        if query.document_type.is_some() {
            conditions.push(format!("d.document_type = ${}", idx));
            idx += 1;
        }
        if query.collection.is_some() {
            conditions.push(format!(
                "d.collection_id = (SELECT id FROM collections WHERE slug = ${})",
                idx
            ));
            idx += 1;
        }
        if query.department.is_some() {
            conditions.push(format!("d.department ILIKE ${}", idx));
            idx += 1;
        }
        if query.year.is_some() {
            conditions.push(format!("d.year = ${}", idx));
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM documents d WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        if let Some(t) = query.document_type {
            count_builder = count_builder.bind(t);
        }
        if let Some(ref c) = query.collection {
            count_builder = count_builder.bind(c);
        }
        if let Some(ref d) = query.department {
            count_builder = count_builder.bind(d);
        }
        if let Some(y) = query.year {
            count_builder = count_builder.bind(y);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            r#"
            SELECT d.* FROM documents d
            WHERE {}
            ORDER BY d.publication_date DESC NULLS LAST, d.submission_date DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Document>(&select_q);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        if let Some(t) = query.document_type {
            builder = builder.bind(t);
        }
        if let Some(ref c) = query.collection {
            builder = builder.bind(c);
        }
        if let Some(ref d) = query.department {
            builder = builder.bind(d);
        }
        if let Some(y) = query.year {
            builder = builder.bind(y);
        }
        let documents = builder.fetch_all(&self.pool).await?;

        Ok((documents, total))
    }

    /// Submissions waiting for review, oldest first (librarian)
    pub async fn list_pending_review(&self) -> AppResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE is_active AND NOT is_approved AND reviewed_by IS NULL
            ORDER BY submission_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    /// Submit a document. New submissions start unapproved and invisible to
    /// the public listing until reviewed. The year falls back to the
    /// publication date's year when not given.
    pub async fn create(&self, submitted_by: i32, data: &CreateDocument) -> AppResult<Document> {
        let year = data
            .year
            .or_else(|| data.publication_date.map(|d| d.year()));

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, subtitle, document_type, collection_id, author,
                                   department, faculty, supervisor, publication_date, year,
                                   publisher, journal_name, file_path, file_size, access_level,
                                   embargo_date, abstract_text, keywords, subject, language,
                                   doi, submitted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.subtitle)
        .bind(data.document_type)
        .bind(data.collection_id)
        .bind(&data.author)
        .bind(&data.department)
        .bind(&data.faculty)
        .bind(&data.supervisor)
        .bind(data.publication_date)
        .bind(year)
        .bind(&data.publisher)
        .bind(&data.journal_name)
        .bind(&data.file_path)
        .bind(data.file_size)
        .bind(data.access_level.unwrap_or(AccessLevel::Open))
        .bind(data.embargo_date)
        .bind(&data.abstract_text)
        .bind(&data.keywords)
        .bind(&data.subject)
        .bind(data.language.as_deref().unwrap_or("English"))
        .bind(&data.doi)
        .bind(submitted_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    /// Approve or reject a submission (librarian)
    pub async fn review(
        &self,
        id: i32,
        reviewed_by: i32,
        data: &ReviewDocument,
    ) -> AppResult<Document> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents SET
                is_approved = $2, reviewed_by = $3, review_date = NOW(),
                notes = COALESCE($4, notes), updated_at = NOW()
            WHERE id = $1 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.is_approved)
        .bind(reviewed_by)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document with id {} not found", id)))?;
        Ok(document)
    }

    pub async fn increment_views(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE documents SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn increment_downloads(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE documents SET download_count = download_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Active collections in display order
    pub async fn list_collections(&self) -> AppResult<Vec<Collection>> {
        let collections = sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections WHERE is_active ORDER BY display_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(collections)
    }
}
