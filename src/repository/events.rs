//! Events repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EventType,
        event::{CreateEvent, Event, EventQuery, EventRegistration, UpdateEvent},
        post::slugify,
    },
};

const EVENT_COLUMNS: &str = r#"
    e.*, (SELECT COUNT(*) FROM event_registrations r
          WHERE r.event_id = e.id AND r.is_confirmed) AS registration_count
"#;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Event> {
        let q = format!(
            "SELECT {} FROM events e WHERE e.slug = $1 AND e.is_published",
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&q)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))
    }

    /// Published events with type and upcoming/past filters
    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<Event>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec![
            "e.is_published".to_string(),
            "NOT e.is_cancelled".to_string(),
        ];
        if query.event_type.is_some() {
            conditions.push("e.event_type = $1".to_string());
        }
        let order = match query.status.as_deref() {
            Some("past") => {
                conditions.push("e.end_date < NOW()".to_string());
                "e.start_date DESC"
            }
            Some("upcoming") => {
                conditions.push("e.start_date > NOW()".to_string());
                "e.start_date"
            }
            _ => "e.start_date",
        };
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM events e WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(t) = query.event_type {
            count_builder = count_builder.bind(t);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT {} FROM events e WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            EVENT_COLUMNS, where_clause, order, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Event>(&select_q);
        if let Some(t) = query.event_type {
            builder = builder.bind(t);
        }
        let events = builder.fetch_all(&self.pool).await?;

        Ok((events, total))
    }

    pub async fn create(&self, organizer_id: i32, data: &CreateEvent) -> AppResult<Event> {
        if data.end_date <= data.start_date {
            return Err(AppError::Validation(
                "End date must be after the start date".to_string(),
            ));
        }

        let slug = data
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&data.title));

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, slug, description, short_description, event_type,
                                start_date, end_date, registration_deadline, location, venue,
                                is_online, online_link, capacity, requires_registration,
                                registration_fee, is_published, is_featured, organizer_id,
                                organizer_name, contact_email, contact_phone, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22)
            RETURNING *, 0::BIGINT AS registration_count
            "#,
        )
        .bind(&data.title)
        .bind(&slug)
        .bind(&data.description)
        .bind(&data.short_description)
        .bind(data.event_type.unwrap_or(EventType::Other))
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.registration_deadline)
        .bind(&data.location)
        .bind(&data.venue)
        .bind(data.is_online.unwrap_or(false))
        .bind(&data.online_link)
        .bind(data.capacity)
        .bind(data.requires_registration.unwrap_or(true))
        .bind(data.registration_fee.unwrap_or_default())
        .bind(data.is_published.unwrap_or(true))
        .bind(data.is_featured.unwrap_or(false))
        .bind(organizer_id)
        .bind(&data.organizer_name)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn update(&self, slug: &str, data: &UpdateEvent) -> AppResult<Event> {
        let current = self.get_by_slug(slug).await?;

        let q = format!(
            r#"
            UPDATE events e SET
                title = $2, description = $3, short_description = $4, event_type = $5,
                start_date = $6, end_date = $7, registration_deadline = $8, location = $9,
                venue = $10, capacity = $11, is_published = $12, is_featured = $13,
                is_cancelled = $14, updated_at = NOW()
            WHERE e.id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&q)
            .bind(current.id)
            .bind(data.title.as_deref().unwrap_or(&current.title))
            .bind(data.description.as_deref().unwrap_or(&current.description))
            .bind(
                data.short_description
                    .as_ref()
                    .or(current.short_description.as_ref()),
            )
            .bind(data.event_type.unwrap_or(current.event_type))
            .bind(data.start_date.unwrap_or(current.start_date))
            .bind(data.end_date.unwrap_or(current.end_date))
            .bind(
                data.registration_deadline
                    .or(current.registration_deadline),
            )
            .bind(data.location.as_deref().unwrap_or(&current.location))
            .bind(data.venue.as_ref().or(current.venue.as_ref()))
            .bind(data.capacity.or(current.capacity))
            .bind(data.is_published.unwrap_or(current.is_published))
            .bind(data.is_featured.unwrap_or(current.is_featured))
            .bind(data.is_cancelled.unwrap_or(current.is_cancelled))
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    /// Register a user for an event. Capacity and deadline are checked
    /// under a lock on the event row so a full event never oversells.
    pub async fn register(&self, slug: &str, user_id: i32) -> AppResult<EventRegistration> {
        let mut tx = self.pool.begin().await?;

        let q = format!(
            "SELECT {} FROM events e WHERE e.slug = $1 AND e.is_published FOR UPDATE OF e",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&q)
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))?;

        let now = Utc::now();
        if !event.requires_registration {
            return Err(AppError::BusinessRule(
                "This event does not require registration".to_string(),
            ));
        }
        if event.is_cancelled || event.is_past(now) {
            return Err(AppError::BusinessRule(
                "Registration is closed for this event".to_string(),
            ));
        }
        if !event.registration_open(now) {
            return Err(AppError::BusinessRule(
                "The registration deadline has passed".to_string(),
            ));
        }
        if event.is_full() {
            return Err(AppError::BusinessRule(
                "This event is fully booked".to_string(),
            ));
        }

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM event_registrations WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event.id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(AppError::Conflict(
                "You are already registered for this event".to_string(),
            ));
        }

        let registration = sqlx::query_as::<_, EventRegistration>(
            r#"
            INSERT INTO event_registrations (event_id, user_id, is_confirmed, registration_date,
                                             confirmation_date, payment_status)
            VALUES ($1, $2, TRUE, $3, $3,
                    CASE WHEN $4 THEN 'pending' ELSE 'paid' END)
            RETURNING *
            "#,
        )
        .bind(event.id)
        .bind(user_id)
        .bind(now)
        .bind(event.registration_fee > rust_decimal::Decimal::ZERO)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(registration)
    }

    /// Withdraw a registration
    pub async fn unregister(&self, slug: &str, user_id: i32) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM event_registrations
            WHERE user_id = $1
              AND event_id = (SELECT id FROM events WHERE slug = $2)
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "You are not registered for this event".to_string(),
            ));
        }
        Ok(())
    }

    /// Registrations for an event (librarian)
    pub async fn list_registrations(&self, slug: &str) -> AppResult<Vec<EventRegistration>> {
        let registrations = sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT r.* FROM event_registrations r
            JOIN events e ON e.id = r.event_id
            WHERE e.slug = $1
            ORDER BY r.registration_date
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;
        Ok(registrations)
    }

    /// Mark attendance (librarian, at the door)
    pub async fn mark_attended(&self, registration_id: i32) -> AppResult<EventRegistration> {
        let registration = sqlx::query_as::<_, EventRegistration>(
            r#"
            UPDATE event_registrations SET
                is_attended = TRUE, attendance_date = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Registration with id {} not found", registration_id))
        })?;
        Ok(registration)
    }
}
