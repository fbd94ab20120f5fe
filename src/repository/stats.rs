//! Aggregate statistics for the staff dashboard

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Pool, Postgres};
use utoipa::ToSchema;

use crate::error::AppResult;

/// Library-wide counters
#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub copies_on_loan: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub pending_reservations: i64,
    pub pending_fines_total: Decimal,
    pub total_users: i64,
    pub active_users: i64,
    pub approved_documents: i64,
    pub total_downloads: i64,
    pub published_posts: i64,
    pub upcoming_events: i64,
}

/// Most-borrowed book over a window
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PopularBook {
    pub book_id: i32,
    pub title: String,
    pub loan_count: i64,
}

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn library_stats(&self) -> AppResult<LibraryStats> {
        let (total_books, total_copies, available_copies): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_copies), 0),
                   COALESCE(SUM(available_copies), 0)
            FROM books WHERE is_active
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let copies_on_loan: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE status = 'on_loan'")
                .fetch_one(&self.pool)
                .await?;

        let (active_loans, overdue_loans): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'active'),
                   COUNT(*) FILTER (WHERE status = 'overdue'
                                    OR (status = 'active' AND due_date < NOW()))
            FROM loans
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let pending_reservations: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;

        let pending_fines_total: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(amount) FROM fines WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        let (total_users, active_users): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM users",
        )
        .fetch_one(&self.pool)
        .await?;

        let (approved_documents, total_downloads): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE is_approved),
                   COALESCE(SUM(download_count), 0)::BIGINT
            FROM documents WHERE is_active
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let published_posts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE is_published")
                .fetch_one(&self.pool)
                .await?;

        let upcoming_events: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM events WHERE is_published AND NOT is_cancelled AND start_date > NOW()",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LibraryStats {
            total_books,
            total_copies,
            available_copies,
            copies_on_loan,
            active_loans,
            overdue_loans,
            pending_reservations,
            pending_fines_total: pending_fines_total.unwrap_or_default(),
            total_users,
            active_users,
            approved_documents,
            total_downloads,
            published_posts,
            upcoming_events,
        })
    }

    /// Most-borrowed books over the last N days
    pub async fn popular_books(&self, days: i64, limit: i64) -> AppResult<Vec<PopularBook>> {
        let books = sqlx::query_as::<_, PopularBook>(
            r#"
            SELECT l.book_id, b.title, COUNT(*) AS loan_count
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE l.checkout_date > NOW() - ($1 || ' days')::INTERVAL
            GROUP BY l.book_id, b.title
            ORDER BY loan_count DESC
            LIMIT $2
            "#,
        )
        .bind(days.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }
}
