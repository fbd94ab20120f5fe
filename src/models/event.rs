//! Event and registration models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{EventType, PaymentStatus};

/// Library event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: String,
    pub venue: Option<String>,
    pub is_online: bool,
    pub online_link: Option<String>,
    /// NULL means unlimited
    pub capacity: Option<i32>,
    pub requires_registration: bool,
    pub registration_fee: Decimal,
    pub is_published: bool,
    pub is_featured: bool,
    pub is_cancelled: bool,
    pub organizer_id: Option<i32>,
    pub organizer_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tags: Option<String>,
    /// Count of confirmed registrations (populated by JOIN queries)
    #[sqlx(default)]
    pub registration_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_date > now && !self.is_cancelled
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date && !self.is_cancelled
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.end_date < now
    }

    /// Remaining capacity, None when the event is uncapped
    pub fn available_spots(&self) -> Option<i64> {
        let capacity = self.capacity? as i64;
        Some((capacity - self.registration_count.unwrap_or(0)).max(0))
    }

    /// An uncapped event is never full
    pub fn is_full(&self) -> bool {
        match self.capacity {
            None => false,
            Some(capacity) => self.registration_count.unwrap_or(0) >= capacity as i64,
        }
    }

    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        match self.registration_deadline {
            Some(deadline) => now <= deadline,
            None => true,
        }
    }
}

/// Event registration record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventRegistration {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub is_confirmed: bool,
    pub is_attended: bool,
    pub registration_date: DateTime<Utc>,
    pub confirmation_date: Option<DateTime<Utc>>,
    pub attendance_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create event request (librarian)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub short_description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub venue: Option<String>,
    pub is_online: Option<bool>,
    pub online_link: Option<String>,
    pub capacity: Option<i32>,
    pub requires_registration: Option<bool>,
    pub registration_fee: Option<Decimal>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub organizer_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tags: Option<String>,
}

/// Update event request (librarian)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub capacity: Option<i32>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_cancelled: Option<bool>,
}

/// Query parameters for the event list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    /// "upcoming" or "past"
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn event(capacity: Option<i32>, registrations: i64, starts_in_hours: i64) -> (Event, DateTime<Utc>) {
        let now = Utc::now();
        let event = Event {
            id: 1,
            title: "Research Skills Workshop".to_string(),
            slug: "research-skills-workshop".to_string(),
            description: "Hands-on workshop".to_string(),
            short_description: None,
            event_type: EventType::Workshop,
            start_date: now + Duration::hours(starts_in_hours),
            end_date: now + Duration::hours(starts_in_hours + 2),
            registration_deadline: None,
            location: "Main Library".to_string(),
            venue: None,
            is_online: false,
            online_link: None,
            capacity,
            requires_registration: true,
            registration_fee: Decimal::ZERO,
            is_published: true,
            is_featured: false,
            is_cancelled: false,
            organizer_id: None,
            organizer_name: None,
            contact_email: None,
            contact_phone: None,
            tags: None,
            registration_count: Some(registrations),
            created_at: now,
            updated_at: now,
        };
        (event, now)
    }

    #[test]
    fn uncapped_event_is_never_full() {
        let (event, _) = event(None, 10_000, 24);
        assert!(!event.is_full());
        assert_eq!(event.available_spots(), None);
    }

    #[test]
    fn full_event_has_no_spots() {
        let (event, _) = event(Some(30), 30, 24);
        assert!(event.is_full());
        assert_eq!(event.available_spots(), Some(0));

        let (event, _) = self::event(Some(30), 12, 24);
        assert!(!event.is_full());
        assert_eq!(event.available_spots(), Some(18));
    }

    #[test]
    fn cancelled_event_is_not_upcoming() {
        let (mut event, now) = event(None, 0, 24);
        assert!(event.is_upcoming(now));
        event.is_cancelled = true;
        assert!(!event.is_upcoming(now));
    }

    #[test]
    fn ongoing_and_past_windows() {
        let (event, now) = event(None, 0, -1);
        assert!(event.is_ongoing(now));
        assert!(!event.is_past(now));

        let (event, now) = self::event(None, 0, -48);
        assert!(!event.is_ongoing(now));
        assert!(event.is_past(now));
    }

    #[test]
    fn deadline_closes_registration() {
        let (mut event, now) = event(None, 0, 24);
        assert!(event.registration_open(now));
        event.registration_deadline = Some(now - Duration::hours(1));
        assert!(!event.registration_open(now));
    }
}
