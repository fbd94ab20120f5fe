//! Loans repository: checkout, renewal and return flows
//!
//! Every write that touches a copy runs the copy flip and the book's
//! available_copies recount inside one transaction, so the derived count
//! never drifts from the copy rows.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{CopyStatus, LoanStatus},
        loan::{Loan, LoanDetails, LoanQuery},
        Fine, Reservation,
    },
    repository::{books::BooksRepository, reservations::ReservationsRepository},
};

/// What happened when a loan was returned, for the caller to log and
/// notify on.
#[derive(Debug)]
pub struct ReturnOutcome {
    pub loan: Loan,
    pub days_late: i64,
    /// Fine created for a late return, if any
    pub fine: Option<Fine>,
    /// Reservation promoted to pickup, if the book had a waiting list
    pub promoted: Option<Reservation>,
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Check out a copy to a user
    pub async fn checkout(
        &self,
        user_id: i32,
        copy_id: i32,
        loan_period_days: i64,
        max_renewals: i32,
        checked_out_by: Option<i32>,
        notes: Option<&str>,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let user_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        match user_active {
            None => {
                return Err(AppError::NotFound(format!(
                    "User with id {} not found",
                    user_id
                )))
            }
            Some(false) => {
                return Err(AppError::BusinessRule(
                    "This account is inactive and cannot borrow".to_string(),
                ))
            }
            Some(true) => {}
        }

        let copy: Option<(i32, CopyStatus)> =
            sqlx::query_as("SELECT book_id, status FROM copies WHERE id = $1 FOR UPDATE")
                .bind(copy_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (book_id, status) = copy
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", copy_id)))?;

        if status != CopyStatus::Available {
            return Err(AppError::BusinessRule(
                "This copy is not available for checkout".to_string(),
            ));
        }

        let now = Utc::now();
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, copy_id, book_id, checkout_date, due_date,
                               status, max_renewals, notes, checked_out_by)
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(copy_id)
        .bind(book_id)
        .bind(now)
        .bind(now + Duration::days(loan_period_days))
        .bind(max_renewals)
        .bind(notes)
        .bind(checked_out_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE copies SET status = 'on_loan', updated_at = NOW() WHERE id = $1")
            .bind(copy_id)
            .execute(&mut *tx)
            .await?;
        BooksRepository::recount_available(&mut tx, book_id).await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Renew a loan, extending the due date from today
    pub async fn renew(&self, id: i32, renewal_days: i64) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        let now = Utc::now();
        if loan.is_overdue(now) {
            // Persist the flip even though the renewal is refused
            sqlx::query("UPDATE loans SET status = 'overdue', updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Err(AppError::BusinessRule(
                "Overdue loans cannot be renewed".to_string(),
            ));
        }
        if !loan.can_renew(now) {
            return Err(AppError::BusinessRule(
                "This loan cannot be renewed".to_string(),
            ));
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                due_date = $2, renewed_count = renewed_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now + Duration::days(renewal_days))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Return a loan. Late returns create a pending fine at the given daily
    /// rate (a zero rate disables fines); if the book has a waiting list the
    /// copy is held and the head reservation is promoted to pickup.
    pub async fn return_loan(
        &self,
        id: i32,
        returned_to: Option<i32>,
        fine_daily_rate: Decimal,
        reservation_pickup_days: i64,
    ) -> AppResult<ReturnOutcome> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if !matches!(loan.status, LoanStatus::Active | LoanStatus::Overdue) {
            return Err(AppError::BusinessRule(
                "This loan has already been returned".to_string(),
            ));
        }

        let now = Utc::now();
        let days_late = (now.date_naive() - loan.due_date.date_naive()).num_days().max(0);

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                return_date = $2, status = 'returned', returned_to = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(returned_to)
        .fetch_one(&mut *tx)
        .await?;

        let fine = if days_late > 0 && fine_daily_rate > Decimal::ZERO {
            let amount = fine_daily_rate * Decimal::from(days_late);
            let fine = sqlx::query_as::<_, Fine>(
                r#"
                INSERT INTO fines (loan_id, user_id, amount, status, due_date, notes)
                VALUES ($1, $2, $3, 'pending', $4, $5)
                RETURNING *
                "#,
            )
            .bind(loan.id)
            .bind(loan.user_id)
            .bind(amount)
            .bind((now + Duration::days(30)).date_naive())
            .bind(format!("Returned {} day(s) late", days_late))
            .fetch_one(&mut *tx)
            .await?;
            Some(fine)
        } else {
            None
        };

        // Head of the waiting list, if any, gets the copy held for pickup
        let head = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE book_id = $1 AND status = 'pending'
            ORDER BY queue_position
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(loan.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let promoted = match head {
            Some(reservation) => {
                let promoted = sqlx::query_as::<_, Reservation>(
                    r#"
                    UPDATE reservations SET
                        status = 'available', expiry_date = $2, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(reservation.id)
                .bind(now + Duration::days(reservation_pickup_days))
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    "UPDATE copies SET status = 'reserved', updated_at = NOW() WHERE id = $1",
                )
                .bind(loan.copy_id)
                .execute(&mut *tx)
                .await?;

                ReservationsRepository::renumber_pending(&mut tx, loan.book_id).await?;
                Some(promoted)
            }
            None => {
                sqlx::query(
                    "UPDATE copies SET status = 'available', updated_at = NOW() WHERE id = $1",
                )
                .bind(loan.copy_id)
                .execute(&mut *tx)
                .await?;
                None
            }
        };

        BooksRepository::recount_available(&mut tx, loan.book_id).await?;
        tx.commit().await?;

        Ok(ReturnOutcome {
            loan,
            days_late,
            fine,
            promoted,
        })
    }

    /// Mark a lost loan and its copy
    pub async fn mark_lost(&self, id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = 'lost', updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        sqlx::query("UPDATE copies SET status = 'lost', updated_at = NOW() WHERE id = $1")
            .bind(loan.copy_id)
            .execute(&mut *tx)
            .await?;
        BooksRepository::recount_available(&mut tx, loan.book_id).await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Flip every active loan past its due date to overdue. Returns the
    /// number of loans flipped.
    pub async fn refresh_overdue(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE loans SET status = 'overdue', updated_at = NOW()
             WHERE status = 'active' AND due_date < NOW()",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List loans with joined book and borrower details (librarian)
    pub async fn list(&self, query: &LoanQuery) -> AppResult<(Vec<LoanDetails>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 1;
        if query.status.is_some() {
            conditions.push(format!("l.status = ${}", idx));
            idx += 1;
        }
        if query.user_id.is_some() {
            conditions.push(format!("l.user_id = ${}", idx));
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM loans l WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(s) = query.status {
            count_builder = count_builder.bind(s);
        }
        if let Some(u) = query.user_id {
            count_builder = count_builder.bind(u);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            r#"
            SELECT l.id, l.user_id, l.copy_id, l.book_id,
                   b.title AS book_title, c.barcode AS copy_barcode,
                   TRIM(CONCAT(u.first_name, ' ', u.last_name)) AS borrower,
                   l.checkout_date, l.due_date, l.return_date, l.status,
                   l.renewed_count, l.max_renewals
            FROM loans l
            JOIN books b ON b.id = l.book_id
            JOIN copies c ON c.id = l.copy_id
            JOIN users u ON u.id = l.user_id
            WHERE {}
            ORDER BY l.checkout_date DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, LoanDetails>(&select_q);
        if let Some(s) = query.status {
            builder = builder.bind(s);
        }
        if let Some(u) = query.user_id {
            builder = builder.bind(u);
        }
        let loans = builder.fetch_all(&self.pool).await?;

        Ok((loans, total))
    }

    /// A user's own loans, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.id, l.user_id, l.copy_id, l.book_id,
                   b.title AS book_title, c.barcode AS copy_barcode,
                   TRIM(CONCAT(u.first_name, ' ', u.last_name)) AS borrower,
                   l.checkout_date, l.due_date, l.return_date, l.status,
                   l.renewed_count, l.max_renewals
            FROM loans l
            JOIN books b ON b.id = l.book_id
            JOIN copies c ON c.id = l.copy_id
            JOIN users u ON u.id = l.user_id
            WHERE l.user_id = $1
            ORDER BY l.checkout_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// A user's active loans ordered by due date (dashboard)
    pub async fn active_for_user(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.details_for_user(user_id, LoanStatus::Active).await
    }

    /// A user's overdue loans (dashboard)
    pub async fn overdue_for_user(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.details_for_user(user_id, LoanStatus::Overdue).await
    }

    async fn details_for_user(
        &self,
        user_id: i32,
        status: LoanStatus,
    ) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.id, l.user_id, l.copy_id, l.book_id,
                   b.title AS book_title, c.barcode AS copy_barcode,
                   TRIM(CONCAT(u.first_name, ' ', u.last_name)) AS borrower,
                   l.checkout_date, l.due_date, l.return_date, l.status,
                   l.renewed_count, l.max_renewals
            FROM loans l
            JOIN books b ON b.id = l.book_id
            JOIN copies c ON c.id = l.copy_id
            JOIN users u ON u.id = l.user_id
            WHERE l.user_id = $1 AND l.status = $2
            ORDER BY l.due_date
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }
}
