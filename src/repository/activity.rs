//! Analytics repository: activity log and search query records

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        activity::{ActivityQuery, NewActivity, UserActivity},
        enums::SearchType,
    },
};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: Pool<Postgres>,
}

impl ActivityRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append an activity record
    pub async fn record(&self, activity: &NewActivity) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_activities (user_id, action_type, description, ip_address,
                                         user_agent, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(activity.user_id)
        .bind(activity.action_type)
        .bind(&activity.description)
        .bind(&activity.ip_address)
        .bind(&activity.user_agent)
        .bind(&activity.metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record a search and how many results it found
    pub async fn record_search(
        &self,
        query: &str,
        user_id: Option<i32>,
        result_count: i64,
        search_type: SearchType,
        filters: serde_json::Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO search_queries (query, user_id, result_count, search_type, filters)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(query)
        .bind(user_id)
        .bind(result_count as i32)
        .bind(search_type)
        .bind(filters)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Activity feed, newest first (librarian)
    pub async fn list(&self, query: &ActivityQuery) -> AppResult<(Vec<UserActivity>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 1;
        if query.action_type.is_some() {
            conditions.push(format!("action_type = ${}", idx));
            idx += 1;
        }
        if query.user_id.is_some() {
            conditions.push(format!("user_id = ${}", idx));
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM user_activities WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(a) = query.action_type {
            count_builder = count_builder.bind(a);
        }
        if let Some(u) = query.user_id {
            count_builder = count_builder.bind(u);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM user_activities WHERE {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, UserActivity>(&select_q);
        if let Some(a) = query.action_type {
            builder = builder.bind(a);
        }
        if let Some(u) = query.user_id {
            builder = builder.bind(u);
        }
        let activities = builder.fetch_all(&self.pool).await?;

        Ok((activities, total))
    }

    /// Most frequent search terms over the last N days (librarian)
    pub async fn top_searches(&self, days: i64, limit: i64) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT query, COUNT(*) AS uses
            FROM search_queries
            WHERE created_at > NOW() - ($1 || ' days')::INTERVAL
            GROUP BY query
            ORDER BY uses DESC
            LIMIT $2
            "#,
        )
        .bind(days.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
