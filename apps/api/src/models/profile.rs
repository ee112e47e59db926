use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeveloperProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub headline: Option<String>,
    pub availability: Option<String>,
    pub hourly_rate: Option<i32>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub work_style: Option<String>,
    pub team_size: Option<i32>,
    pub created_at: DateTime<Utc>,
}
