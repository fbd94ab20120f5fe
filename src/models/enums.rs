//! Shared domain status enums (stored as text slugs)

use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use utoipa::ToSchema;

/// Wires a slug enum to SQLx as a TEXT column via its FromStr/as_str pair.
macro_rules! slug_sql {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> sqlx::Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = sqlx::Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <String as sqlx::Encode<Postgres>>::encode(self.as_str().to_string(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// MembershipType
// ---------------------------------------------------------------------------

/// Library membership categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    Student,
    Faculty,
    Staff,
    Public,
    Admin,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Student => "student",
            MembershipType::Faculty => "faculty",
            MembershipType::Staff => "staff",
            MembershipType::Public => "public",
            MembershipType::Admin => "admin",
        }
    }
}

impl std::str::FromStr for MembershipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(MembershipType::Student),
            "faculty" => Ok(MembershipType::Faculty),
            "staff" => Ok(MembershipType::Staff),
            "public" => Ok(MembershipType::Public),
            "admin" => Ok(MembershipType::Admin),
            _ => Err(format!("Invalid membership type: {}", s)),
        }
    }
}

impl Default for MembershipType {
    fn default() -> Self {
        MembershipType::Student
    }
}

slug_sql!(MembershipType);

// ---------------------------------------------------------------------------
// CopyStatus
// ---------------------------------------------------------------------------

/// Status of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    Available,
    OnLoan,
    Reserved,
    Maintenance,
    Lost,
    Withdrawn,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "available",
            CopyStatus::OnLoan => "on_loan",
            CopyStatus::Reserved => "reserved",
            CopyStatus::Maintenance => "maintenance",
            CopyStatus::Lost => "lost",
            CopyStatus::Withdrawn => "withdrawn",
        }
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(CopyStatus::Available),
            "on_loan" => Ok(CopyStatus::OnLoan),
            "reserved" => Ok(CopyStatus::Reserved),
            "maintenance" => Ok(CopyStatus::Maintenance),
            "lost" => Ok(CopyStatus::Lost),
            "withdrawn" => Ok(CopyStatus::Withdrawn),
            _ => Err(format!("Invalid copy status: {}", s)),
        }
    }
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Available
    }
}

slug_sql!(CopyStatus);

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
    Lost,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Overdue => "overdue",
            LoanStatus::Lost => "lost",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            "overdue" => Ok(LoanStatus::Overdue),
            "lost" => Ok(LoanStatus::Lost),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

slug_sql!(LoanStatus);

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Available,
    Fulfilled,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Available => "available",
            ReservationStatus::Fulfilled => "fulfilled",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "available" => Ok(ReservationStatus::Available),
            "fulfilled" => Ok(ReservationStatus::Fulfilled),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "expired" => Ok(ReservationStatus::Expired),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

slug_sql!(ReservationStatus);

// ---------------------------------------------------------------------------
// FineStatus
// ---------------------------------------------------------------------------

/// Fine lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FineStatus {
    Pending,
    Paid,
    Waived,
    Cancelled,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Pending => "pending",
            FineStatus::Paid => "paid",
            FineStatus::Waived => "waived",
            FineStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for FineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FineStatus::Pending),
            "paid" => Ok(FineStatus::Paid),
            "waived" => Ok(FineStatus::Waived),
            "cancelled" => Ok(FineStatus::Cancelled),
            _ => Err(format!("Invalid fine status: {}", s)),
        }
    }
}

slug_sql!(FineStatus);

// ---------------------------------------------------------------------------
// AccessLevel
// ---------------------------------------------------------------------------

/// Document visibility policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Open,
    Restricted,
    Embargoed,
    Private,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Open => "open",
            AccessLevel::Restricted => "restricted",
            AccessLevel::Embargoed => "embargoed",
            AccessLevel::Private => "private",
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(AccessLevel::Open),
            "restricted" => Ok(AccessLevel::Restricted),
            "embargoed" => Ok(AccessLevel::Embargoed),
            "private" => Ok(AccessLevel::Private),
            _ => Err(format!("Invalid access level: {}", s)),
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Open
    }
}

slug_sql!(AccessLevel);

// ---------------------------------------------------------------------------
// DocumentType
// ---------------------------------------------------------------------------

/// Institutional repository document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Thesis,
    Dissertation,
    Journal,
    Conference,
    Project,
    Book,
    Dataset,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Thesis => "thesis",
            DocumentType::Dissertation => "dissertation",
            DocumentType::Journal => "journal",
            DocumentType::Conference => "conference",
            DocumentType::Project => "project",
            DocumentType::Book => "book",
            DocumentType::Dataset => "dataset",
            DocumentType::Other => "other",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thesis" => Ok(DocumentType::Thesis),
            "dissertation" => Ok(DocumentType::Dissertation),
            "journal" => Ok(DocumentType::Journal),
            "conference" => Ok(DocumentType::Conference),
            "project" => Ok(DocumentType::Project),
            "book" => Ok(DocumentType::Book),
            "dataset" => Ok(DocumentType::Dataset),
            "other" => Ok(DocumentType::Other),
            _ => Err(format!("Invalid document type: {}", s)),
        }
    }
}

slug_sql!(DocumentType);

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Library event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Workshop,
    Seminar,
    Exhibition,
    Training,
    Meeting,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Workshop => "workshop",
            EventType::Seminar => "seminar",
            EventType::Exhibition => "exhibition",
            EventType::Training => "training",
            EventType::Meeting => "meeting",
            EventType::Other => "other",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workshop" => Ok(EventType::Workshop),
            "seminar" => Ok(EventType::Seminar),
            "exhibition" => Ok(EventType::Exhibition),
            "training" => Ok(EventType::Training),
            "meeting" => Ok(EventType::Meeting),
            "other" => Ok(EventType::Other),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other
    }
}

slug_sql!(EventType);

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Event registration payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Waived,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Waived => "waived",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "waived" => Ok(PaymentStatus::Waived),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

slug_sql!(PaymentStatus);

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Tracked user activity actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Login,
    Logout,
    Search,
    ViewBook,
    ViewDocument,
    Borrow,
    Return,
    Reserve,
    Download,
    Comment,
    RegisterEvent,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Login => "login",
            ActionType::Logout => "logout",
            ActionType::Search => "search",
            ActionType::ViewBook => "view_book",
            ActionType::ViewDocument => "view_document",
            ActionType::Borrow => "borrow",
            ActionType::Return => "return",
            ActionType::Reserve => "reserve",
            ActionType::Download => "download",
            ActionType::Comment => "comment",
            ActionType::RegisterEvent => "register_event",
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(ActionType::Login),
            "logout" => Ok(ActionType::Logout),
            "search" => Ok(ActionType::Search),
            "view_book" => Ok(ActionType::ViewBook),
            "view_document" => Ok(ActionType::ViewDocument),
            "borrow" => Ok(ActionType::Borrow),
            "return" => Ok(ActionType::Return),
            "reserve" => Ok(ActionType::Reserve),
            "download" => Ok(ActionType::Download),
            "comment" => Ok(ActionType::Comment),
            "register_event" => Ok(ActionType::RegisterEvent),
            _ => Err(format!("Invalid action type: {}", s)),
        }
    }
}

slug_sql!(ActionType);

// ---------------------------------------------------------------------------
// SearchType
// ---------------------------------------------------------------------------

/// Which surface a search query came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Catalog,
    Repository,
    Blog,
    General,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Catalog => "catalog",
            SearchType::Repository => "repository",
            SearchType::Blog => "blog",
            SearchType::General => "general",
        }
    }
}

impl std::str::FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(SearchType::Catalog),
            "repository" => Ok(SearchType::Repository),
            "blog" => Ok(SearchType::Blog),
            "general" => Ok(SearchType::General),
            _ => Err(format!("Invalid search type: {}", s)),
        }
    }
}

impl Default for SearchType {
    fn default() -> Self {
        SearchType::General
    }
}

slug_sql!(SearchType);
