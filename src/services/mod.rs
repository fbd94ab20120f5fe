//! Business logic services

pub mod analytics;
pub mod auth;
pub mod blog;
pub mod catalog;
pub mod circulation;
pub mod documents;
pub mod email;
pub mod events;

use crate::{
    config::{AuthConfig, CirculationConfig, EmailConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub documents: documents::DocumentsService,
    pub blog: blog::BlogService,
    pub events: events::EventsService,
    pub analytics: analytics::AnalyticsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        circulation_config: CirculationConfig,
    ) -> AppResult<Self> {
        let email = email::EmailService::new(email_config);
        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(
                repository.clone(),
                circulation_config,
                email.clone(),
            )?,
            documents: documents::DocumentsService::new(repository.clone()),
            blog: blog::BlogService::new(repository.clone()),
            events: events::EventsService::new(repository.clone()),
            analytics: analytics::AnalyticsService::new(repository),
            email,
        })
    }
}
