use crate::entities::study_session_entity as study_sessions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateStudySessionRequest {
    /// 关联的课程，可为空表示自由练习
    pub class_id: Option<i64>,
    /// 省略时记为当前时间
    #[schema(example = "2025-07-03")]
    pub session_date: Option<String>,
    #[schema(example = 45)]
    pub duration_minutes: Option<i32>,
    #[schema(example = "练习了左手琶音")]
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudySessionRequest {
    pub class_id: Option<i64>,
    pub session_date: Option<String>,
    pub duration_minutes: Option<i32>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudySessionQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudySessionResponse {
    pub id: i64,
    pub user_id: i64,
    pub class_id: Option<i64>,
    pub session_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comments: String,
    pub is_shared: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<study_sessions::Model> for StudySessionResponse {
    fn from(s: study_sessions::Model) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            class_id: s.class_id,
            session_date: s.session_date,
            duration_minutes: s.duration_minutes,
            comments: s.comments,
            is_shared: s.is_shared,
            is_active: s.is_active,
            created_at: s.created_at.unwrap_or_else(Utc::now),
        }
    }
}
