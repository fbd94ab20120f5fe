//! Circulation service: loans, reservations and fines
//!
//! Orchestrates the transactional repository flows and handles the
//! notifications and activity records around them.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        activity::NewActivity,
        enums::{ActionType, FineStatus, ReservationStatus},
        fine::{CreateFine, Fine, PayFine, WaiveFine},
        loan::{CreateLoan, Loan, LoanDetails, LoanQuery},
        reservation::{Reservation, ReservationDetails, ReserveResponse},
        user::UserClaims,
    },
    repository::{loans::ReturnOutcome, Repository},
    services::email::EmailService,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    config: CirculationConfig,
    fine_daily_rate: Decimal,
    email: EmailService,
}

impl CirculationService {
    pub fn new(
        repository: Repository,
        config: CirculationConfig,
        email: EmailService,
    ) -> AppResult<Self> {
        let fine_daily_rate = Decimal::from_str(&config.fine_daily_rate).map_err(|e| {
            AppError::Internal(format!(
                "Invalid circulation.fine_daily_rate '{}': {}",
                config.fine_daily_rate, e
            ))
        })?;
        Ok(Self {
            repository,
            config,
            fine_daily_rate,
            email,
        })
    }

    /// Check out a copy to a member (librarian)
    pub async fn checkout(&self, librarian_id: i32, data: &CreateLoan) -> AppResult<Loan> {
        let copy_id = match (data.copy_id, data.barcode.as_deref()) {
            (Some(id), _) => id,
            (None, Some(barcode)) => self.repository.books.get_copy_by_barcode(barcode).await?.id,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Either copy_id or barcode is required".to_string(),
                ))
            }
        };

        let loan = self
            .repository
            .loans
            .checkout(
                data.user_id,
                copy_id,
                self.config.loan_period_days,
                self.config.max_renewals,
                Some(librarian_id),
                data.notes.as_deref(),
            )
            .await?;

        // A checkout against a held copy fulfils the pickup reservation
        if let Some(reservation) = self
            .pickup_reservation(data.user_id, loan.book_id)
            .await?
        {
            self.repository.reservations.fulfill(reservation.id).await?;
        }

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(data.user_id),
                ActionType::Borrow,
                format!("Borrowed copy {} (loan {})", copy_id, loan.id),
            ))
            .await?;

        Ok(loan)
    }

    async fn pickup_reservation(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> AppResult<Option<ReservationDetails>> {
        let reservations = self.repository.reservations.list_for_user(user_id).await?;
        Ok(reservations.into_iter().find(|r| {
            r.book_id == book_id && r.status == ReservationStatus::Available
        }))
    }

    /// Renew a loan. Members renew their own loans; librarians any.
    pub async fn renew(&self, claims: &UserClaims, loan_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        if loan.user_id != claims.user_id {
            claims.require_librarian()?;
        }
        self.repository
            .loans
            .renew(loan_id, self.config.renewal_days)
            .await
    }

    /// Return a loan (librarian). Late returns produce a fine and a held
    /// book's next reservation is promoted and the member notified.
    pub async fn return_loan(&self, librarian_id: i32, loan_id: i32) -> AppResult<ReturnOutcome> {
        let outcome = self
            .repository
            .loans
            .return_loan(
                loan_id,
                Some(librarian_id),
                self.fine_daily_rate,
                self.config.reservation_pickup_days,
            )
            .await?;

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(outcome.loan.user_id),
                ActionType::Return,
                format!(
                    "Returned loan {} ({} day(s) late)",
                    outcome.loan.id, outcome.days_late
                ),
            ))
            .await?;

        if let Some(ref promoted) = outcome.promoted {
            self.notify_pickup(promoted).await;
        }

        Ok(outcome)
    }

    /// Pickup notifications are best-effort; a mail failure never fails the
    /// return that triggered it.
    async fn notify_pickup(&self, reservation: &Reservation) {
        let user = match self.repository.users.get_by_id(reservation.user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(reservation_id = reservation.id, error = %e, "skipping pickup notification");
                return;
            }
        };
        let book = match self.repository.books.get_by_id(reservation.book_id).await {
            Ok(book) => book,
            Err(e) => {
                warn!(reservation_id = reservation.id, error = %e, "skipping pickup notification");
                return;
            }
        };

        match self
            .email
            .send_reservation_available(&user.email, &book.title, reservation.expiry_date)
            .await
        {
            Ok(()) => {
                if let Err(e) = self.repository.reservations.mark_notified(reservation.id).await {
                    warn!(reservation_id = reservation.id, error = %e, "failed to record notification");
                }
            }
            Err(e) => {
                warn!(reservation_id = reservation.id, error = %e, "pickup notification failed");
            }
        }
    }

    pub async fn mark_lost(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.mark_lost(loan_id).await
    }

    /// Bulk sweep flipping active past-due loans to overdue
    pub async fn refresh_overdue(&self) -> AppResult<u64> {
        self.repository.loans.refresh_overdue().await
    }

    pub async fn list_loans(&self, query: &LoanQuery) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository.loans.list(query).await
    }

    pub async fn user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_for_user(user_id).await
    }

    /// Place a reservation on a book for the calling member
    pub async fn reserve(&self, user_id: i32, book_id: i32) -> AppResult<ReserveResponse> {
        let book = self.repository.books.get_by_id(book_id).await?;
        if book.is_available() {
            return Err(AppError::BusinessRule(
                "Copies of this book are available; no reservation is needed".to_string(),
            ));
        }

        let reservation = self.repository.reservations.create(user_id, book_id, None).await?;

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(user_id),
                ActionType::Reserve,
                format!("Reserved '{}' (position {})", book.title, reservation.queue_position),
            ))
            .await?;

        Ok(ReserveResponse {
            id: reservation.id,
            queue_position: reservation.queue_position,
            message: format!(
                "You are number {} in the queue for '{}'",
                reservation.queue_position, book.title
            ),
        })
    }

    /// Cancel a reservation. Members cancel their own; librarians any.
    pub async fn cancel_reservation(
        &self,
        claims: &UserClaims,
        reservation_id: i32,
    ) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.get_by_id(reservation_id).await?;
        if reservation.user_id != claims.user_id {
            claims.require_librarian()?;
        }
        self.repository.reservations.cancel(reservation_id).await
    }

    pub async fn fulfill_reservation(&self, reservation_id: i32) -> AppResult<Reservation> {
        self.repository.reservations.fulfill(reservation_id).await
    }

    /// Expire stale pickup holds and free their copies
    pub async fn expire_reservations(&self) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.expire_stale().await
    }

    pub async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<ReservationDetails>, i64)> {
        self.repository.reservations.list(status, page, per_page).await
    }

    pub async fn user_reservations(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list_for_user(user_id).await
    }

    pub async fn create_fine(&self, data: &CreateFine) -> AppResult<Fine> {
        self.repository.fines.create(data).await
    }

    pub async fn pay_fine(&self, fine_id: i32, data: &PayFine) -> AppResult<Fine> {
        self.repository.fines.pay(fine_id, data).await
    }

    pub async fn waive_fine(&self, fine_id: i32, waived_by: i32, data: &WaiveFine) -> AppResult<Fine> {
        self.repository.fines.waive(fine_id, waived_by, data).await
    }

    pub async fn list_fines(
        &self,
        status: Option<FineStatus>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<Fine>, i64)> {
        self.repository.fines.list(status, page, per_page).await
    }

    pub async fn user_fines(&self, user_id: i32) -> AppResult<Vec<Fine>> {
        self.repository.fines.list_for_user(user_id).await
    }
}
