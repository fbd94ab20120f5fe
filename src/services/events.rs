//! Events service

use crate::{
    error::AppResult,
    models::{
        activity::NewActivity,
        enums::ActionType,
        event::{CreateEvent, Event, EventQuery, EventRegistration, UpdateEvent},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<Event>, i64)> {
        self.repository.events.list(query).await
    }

    pub async fn get(&self, slug: &str) -> AppResult<Event> {
        self.repository.events.get_by_slug(slug).await
    }

    pub async fn create(&self, organizer_id: i32, data: &CreateEvent) -> AppResult<Event> {
        self.repository.events.create(organizer_id, data).await
    }

    pub async fn update(&self, slug: &str, data: &UpdateEvent) -> AppResult<Event> {
        self.repository.events.update(slug, data).await
    }

    pub async fn register(&self, slug: &str, user_id: i32) -> AppResult<EventRegistration> {
        let registration = self.repository.events.register(slug, user_id).await?;

        self.repository
            .activity
            .record(&NewActivity::new(
                Some(user_id),
                ActionType::RegisterEvent,
                format!("Registered for event '{}'", slug),
            ))
            .await?;

        Ok(registration)
    }

    pub async fn unregister(&self, slug: &str, user_id: i32) -> AppResult<()> {
        self.repository.events.unregister(slug, user_id).await
    }

    pub async fn registrations(&self, slug: &str) -> AppResult<Vec<EventRegistration>> {
        self.repository.events.list_registrations(slug).await
    }

    pub async fn mark_attended(&self, registration_id: i32) -> AppResult<EventRegistration> {
        self.repository.events.mark_attended(registration_id).await
    }
}
