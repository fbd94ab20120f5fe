//! Analytics and reporting service

use crate::{
    error::AppResult,
    models::activity::{ActivityQuery, NewActivity, UserActivity},
    repository::{
        stats::{LibraryStats, PopularBook},
        Repository,
    },
};

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
}

impl AnalyticsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn record(&self, activity: &NewActivity) -> AppResult<()> {
        self.repository.activity.record(activity).await
    }

    pub async fn activity_feed(
        &self,
        query: &ActivityQuery,
    ) -> AppResult<(Vec<UserActivity>, i64)> {
        self.repository.activity.list(query).await
    }

    pub async fn library_stats(&self) -> AppResult<LibraryStats> {
        self.repository.stats.library_stats().await
    }

    pub async fn popular_books(&self, days: i64, limit: i64) -> AppResult<Vec<PopularBook>> {
        self.repository.stats.popular_books(days, limit).await
    }

    pub async fn top_searches(&self, days: i64, limit: i64) -> AppResult<Vec<(String, i64)>> {
        self.repository.activity.top_searches(days, limit).await
    }
}
