//! Analytics models: activity log and search queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::ActionType;

/// Append-only user activity record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserActivity {
    pub id: i64,
    /// NULL for anonymous visitors
    pub user_id: Option<i32>,
    pub action_type: ActionType,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// New activity entry (internal, appended by the services)
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<i32>,
    pub action_type: ActionType,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: serde_json::Value,
}

impl NewActivity {
    pub fn new(user_id: Option<i32>, action_type: ActionType, description: impl Into<String>) -> Self {
        Self {
            user_id,
            action_type,
            description: description.into(),
            ip_address: None,
            user_agent: None,
            metadata: serde_json::Value::Null,
        }
    }
}

/// Query parameters for the activity feed
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ActivityQuery {
    pub action_type: Option<ActionType>,
    pub user_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
