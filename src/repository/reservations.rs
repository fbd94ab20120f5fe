//! Reservations repository
//!
//! Queue positions are assigned and restored under a FOR UPDATE lock on the
//! book row, so concurrent writes against the same book serialize and the
//! pending queue always reads as a dense 1..N sequence.

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ReservationStatus,
        reservation::{Reservation, ReservationDetails},
    },
    repository::books::BooksRepository,
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Restore the dense 1..N ordering of a book's pending queue. Callers
    /// must already hold the book row lock.
    pub(crate) async fn renumber_pending(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE reservations r SET queue_position = ranked.pos, updated_at = NOW()
            FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY reserved_date) AS pos
                  FROM reservations
                  WHERE book_id = $1 AND status = 'pending') ranked
            WHERE r.id = ranked.id AND r.queue_position <> ranked.pos
            "#,
        )
        .bind(book_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn lock_book(tx: &mut Transaction<'_, Postgres>, book_id: i32) -> AppResult<()> {
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM books WHERE id = $1 AND is_active FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut **tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Place a reservation at the back of the book's queue
    pub async fn create(&self, user_id: i32, book_id: i32, notes: Option<&str>) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;
        Self::lock_book(&mut tx, book_id).await?;

        let duplicate: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM reservations
                          WHERE user_id = $1 AND book_id = $2
                            AND status IN ('pending', 'available'))
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(AppError::Conflict(
                "You already have an active reservation for this book".to_string(),
            ));
        }

        let pending: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE book_id = $1 AND status = 'pending'",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, book_id, status, queue_position, reserved_date, notes)
            VALUES ($1, $2, 'pending', $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind((pending + 1) as i32)
        .bind(Utc::now())
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Cancel a pending or pickup-ready reservation and close up the queue
    pub async fn cancel(&self, id: i32) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))?;

        if !matches!(
            current.status,
            ReservationStatus::Pending | ReservationStatus::Available
        ) {
            return Err(AppError::BusinessRule(
                "This reservation can no longer be cancelled".to_string(),
            ));
        }

        Self::lock_book(&mut tx, current.book_id).await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'cancelled', updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if current.status == ReservationStatus::Available {
            Self::release_held_copy(&mut tx, current.book_id).await?;
        }
        Self::renumber_pending(&mut tx, current.book_id).await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Mark a pickup-ready reservation fulfilled (librarian, at checkout)
    pub async fn fulfill(&self, id: i32) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))?;

        if !matches!(
            current.status,
            ReservationStatus::Pending | ReservationStatus::Available
        ) {
            return Err(AppError::BusinessRule(
                "Only pending reservations can be fulfilled".to_string(),
            ));
        }

        Self::lock_book(&mut tx, current.book_id).await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET
                status = 'fulfilled', fulfilled_date = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        Self::renumber_pending(&mut tx, current.book_id).await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Expire pickup-ready reservations whose window has passed and free the
    /// held copies. Returns the reservations that expired.
    pub async fn expire_stale(&self) -> AppResult<Vec<Reservation>> {
        let mut tx = self.pool.begin().await?;

        let expired = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET status = 'expired', updated_at = NOW()
            WHERE status = 'available' AND expiry_date < NOW()
            RETURNING *
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut books: Vec<i32> = expired.iter().map(|r| r.book_id).collect();
        books.sort_unstable();
        books.dedup();
        for book_id in books {
            Self::release_held_copy(&mut tx, book_id).await?;
            Self::renumber_pending(&mut tx, book_id).await?;
            BooksRepository::recount_available(&mut tx, book_id).await?;
        }

        tx.commit().await?;
        Ok(expired)
    }

    /// Free one held copy of a book unless another reservation is still
    /// waiting for pickup.
    async fn release_held_copy(tx: &mut Transaction<'_, Postgres>, book_id: i32) -> AppResult<()> {
        let still_held: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE book_id = $1 AND status = 'available')",
        )
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await?;
        if still_held {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE copies SET status = 'available', updated_at = NOW()
            WHERE id = (SELECT id FROM copies
                        WHERE book_id = $1 AND status = 'reserved'
                        LIMIT 1)
            "#,
        )
        .bind(book_id)
        .execute(&mut **tx)
        .await?;
        BooksRepository::recount_available(tx, book_id).await?;
        Ok(())
    }

    /// Record that the pickup notification email went out
    pub async fn mark_notified(&self, id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE reservations SET notification_sent = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List reservations, optionally filtered by status (librarian)
    pub async fn list(
        &self,
        status: Option<ReservationStatus>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<ReservationDetails>, i64)> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let offset = (page - 1) * per_page;

        let where_clause = if status.is_some() {
            "r.status = $1"
        } else {
            "TRUE"
        };

        let count_q = format!("SELECT COUNT(*) FROM reservations r WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(s) = status {
            count_builder = count_builder.bind(s);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            r#"
            SELECT r.id, r.user_id, r.book_id, b.title AS book_title,
                   r.status, r.queue_position, r.reserved_date, r.expiry_date
            FROM reservations r
            JOIN books b ON b.id = r.book_id
            WHERE {}
            ORDER BY r.reserved_date DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, ReservationDetails>(&select_q);
        if let Some(s) = status {
            builder = builder.bind(s);
        }
        let reservations = builder.fetch_all(&self.pool).await?;

        Ok((reservations, total))
    }

    /// A user's own reservations, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let reservations = sqlx::query_as::<_, ReservationDetails>(
            r#"
            SELECT r.id, r.user_id, r.book_id, b.title AS book_title,
                   r.status, r.queue_position, r.reserved_date, r.expiry_date
            FROM reservations r
            JOIN books b ON b.id = r.book_id
            WHERE r.user_id = $1
            ORDER BY r.reserved_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// A user's open reservations ordered by queue position (dashboard)
    pub async fn open_for_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let reservations = sqlx::query_as::<_, ReservationDetails>(
            r#"
            SELECT r.id, r.user_id, r.book_id, b.title AS book_title,
                   r.status, r.queue_position, r.reserved_date, r.expiry_date
            FROM reservations r
            JOIN books b ON b.id = r.book_id
            WHERE r.user_id = $1 AND r.status IN ('pending', 'available')
            ORDER BY r.queue_position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }
}
