//! Fine (overdue charge) model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::FineStatus;

/// Fine record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub loan_id: i32,
    pub user_id: i32,
    pub amount: Decimal,
    pub status: FineStatus,
    pub due_date: NaiveDate,
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub waived_by: Option<i32>,
    pub waiver_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Manual fine creation request (librarian)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFine {
    pub loan_id: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

/// Fine payment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct PayFine {
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// Fine waiver request
#[derive(Debug, Deserialize, ToSchema)]
pub struct WaiveFine {
    pub reason: Option<String>,
}
