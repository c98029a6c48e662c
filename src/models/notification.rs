use crate::entities::notification_entity as notifications;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub study_session_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(n: notifications::Model) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            message: n.message,
            study_session_id: n.study_session_id,
            is_read: n.is_read,
            created_at: n.created_at.unwrap_or_else(Utc::now),
        }
    }
}
