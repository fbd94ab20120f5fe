//! Reservation (waiting list) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::ReservationStatus;

/// Reservation record from database.
///
/// Pending reservations for a book carry a dense 1..N queue_position
/// ordered by reserved_date; the sequence is restored whenever pending
/// membership changes (create, cancel, fulfill, promote).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub status: ReservationStatus,
    pub queue_position: i32,
    pub reserved_date: DateTime<Utc>,
    pub notification_sent: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub fulfilled_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reservation with book title for user-facing lists
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub status: ReservationStatus,
    pub queue_position: i32,
    pub reserved_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Response after placing a reservation
#[derive(Debug, Serialize, ToSchema)]
pub struct ReserveResponse {
    pub id: i32,
    pub queue_position: i32,
    pub message: String,
}
