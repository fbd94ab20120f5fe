//! Loan model and circulation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::LoanStatus;

/// Loan record from database. Loans are never deleted; a returned loan
/// keeps its row with return_date set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub book_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub renewed_count: i32,
    pub max_renewals: i32,
    pub notes: Option<String>,
    pub checked_out_by: Option<i32>,
    pub returned_to: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// An active loan past its due date counts as overdue even before the
    /// stored status has been flipped.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Active && now > self.due_date
    }

    /// A loan is renewable while it is active, under its renewal limit and
    /// not yet past due.
    pub fn can_renew(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Active
            && self.renewed_count < self.max_renewals
            && !self.is_overdue(now)
    }

    /// Status a loan write should persist: active loans past due flip to
    /// overdue, everything else is stored as-is.
    pub fn effective_status(&self, now: DateTime<Utc>) -> LoanStatus {
        if self.is_overdue(now) {
            LoanStatus::Overdue
        } else {
            self.status
        }
    }
}

/// Loan with book title and borrower name for lists
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub copy_barcode: String,
    pub borrower: String,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub renewed_count: i32,
    pub max_renewals: i32,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub user_id: i32,
    /// Copy ID (optional if barcode provided)
    pub copy_id: Option<i32>,
    /// Copy barcode
    pub barcode: Option<String>,
    pub notes: Option<String>,
}

/// Loan list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub status: Option<LoanStatus>,
    pub user_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn loan(status: LoanStatus, due_in_days: i64, renewed: i32, max: i32) -> (Loan, DateTime<Utc>) {
        let now = Utc::now();
        let loan = Loan {
            id: 1,
            user_id: 1,
            copy_id: 1,
            book_id: 1,
            checkout_date: now - Duration::days(7),
            due_date: now + Duration::days(due_in_days),
            return_date: None,
            status,
            renewed_count: renewed,
            max_renewals: max,
            notes: None,
            checked_out_by: None,
            returned_to: None,
            created_at: now,
            updated_at: now,
        };
        (loan, now)
    }

    #[test]
    fn renewal_blocked_at_max_regardless_of_due_date() {
        let (loan, now) = loan(LoanStatus::Active, 10, 2, 2);
        assert!(!loan.can_renew(now));
    }

    #[test]
    fn renewal_blocked_when_past_due() {
        let (loan, now) = loan(LoanStatus::Active, -1, 0, 2);
        assert!(!loan.can_renew(now));
        assert!(loan.is_overdue(now));
    }

    #[test]
    fn renewal_allowed_under_limit_and_before_due() {
        let (loan, now) = loan(LoanStatus::Active, 5, 1, 2);
        assert!(loan.can_renew(now));
    }

    #[test]
    fn returned_loan_is_never_overdue_or_renewable() {
        let (loan, now) = loan(LoanStatus::Returned, -30, 0, 2);
        assert!(!loan.is_overdue(now));
        assert!(!loan.can_renew(now));
        assert_eq!(loan.effective_status(now), LoanStatus::Returned);
    }

    #[test]
    fn effective_status_flips_active_past_due_to_overdue() {
        let (loan, now) = loan(LoanStatus::Active, -1, 0, 2);
        assert_eq!(loan.effective_status(now), LoanStatus::Overdue);

        let (fresh, now) = loan2(LoanStatus::Active, 1);
        assert_eq!(fresh.effective_status(now), LoanStatus::Active);
    }

    fn loan2(status: LoanStatus, due_in_days: i64) -> (Loan, DateTime<Utc>) {
        loan(status, due_in_days, 0, 2)
    }
}
