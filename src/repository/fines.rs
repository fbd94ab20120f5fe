//! Fines repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::FineStatus,
        fine::{CreateFine, Fine, PayFine, WaiveFine},
    },
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))
    }

    /// Record a manual fine against a loan (librarian)
    pub async fn create(&self, data: &CreateFine) -> AppResult<Fine> {
        let user_id: Option<i32> =
            sqlx::query_scalar("SELECT user_id FROM loans WHERE id = $1")
                .bind(data.loan_id)
                .fetch_optional(&self.pool)
                .await?;
        let user_id = user_id.ok_or_else(|| {
            AppError::NotFound(format!("Loan with id {} not found", data.loan_id))
        })?;

        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (loan_id, user_id, amount, status, due_date, notes)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.loan_id)
        .bind(user_id)
        .bind(data.amount)
        .bind(data.due_date)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(fine)
    }

    /// Settle a pending fine
    pub async fn pay(&self, id: i32, data: &PayFine) -> AppResult<Fine> {
        let current = self.get_by_id(id).await?;
        if current.status != FineStatus::Pending {
            return Err(AppError::BusinessRule(
                "Only pending fines can be paid".to_string(),
            ));
        }

        let fine = sqlx::query_as::<_, Fine>(
            r#"
            UPDATE fines SET
                status = 'paid', paid_date = NOW(), payment_method = $2,
                transaction_id = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.payment_method)
        .bind(&data.transaction_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Only pending fines can be paid".to_string()))?;
        Ok(fine)
    }

    /// Waive a pending fine (librarian)
    pub async fn waive(&self, id: i32, waived_by: i32, data: &WaiveFine) -> AppResult<Fine> {
        let current = self.get_by_id(id).await?;
        if current.status != FineStatus::Pending {
            return Err(AppError::BusinessRule(
                "Only pending fines can be waived".to_string(),
            ));
        }

        let fine = sqlx::query_as::<_, Fine>(
            r#"
            UPDATE fines SET
                status = 'waived', waived_by = $2, waiver_reason = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(waived_by)
        .bind(&data.reason)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Only pending fines can be waived".to_string()))?;
        Ok(fine)
    }

    /// List fines, optionally by status (librarian)
    pub async fn list(
        &self,
        status: Option<FineStatus>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<Fine>, i64)> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let offset = (page - 1) * per_page;

        let where_clause = if status.is_some() { "status = $1" } else { "TRUE" };

        let count_q = format!("SELECT COUNT(*) FROM fines WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(s) = status {
            count_builder = count_builder.bind(s);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM fines WHERE {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Fine>(&select_q);
        if let Some(s) = status {
            builder = builder.bind(s);
        }
        let fines = builder.fetch_all(&self.pool).await?;

        Ok((fines, total))
    }

    /// A user's own fines, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    /// A user's unpaid fines (dashboard)
    pub async fn pending_for_user(&self, user_id: i32) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE user_id = $1 AND status = 'pending' ORDER BY due_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    /// Outstanding (pending) balance for a user
    pub async fn pending_total_for_user(&self, user_id: i32) -> AppResult<rust_decimal::Decimal> {
        let total: Option<rust_decimal::Decimal> = sqlx::query_scalar(
            "SELECT SUM(amount) FROM fines WHERE user_id = $1 AND status = 'pending'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total.unwrap_or_default())
    }
}
