use crate::entities::{ClassStatus, class_entity as classes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateClassRequest {
    pub status: Option<ClassStatus>,
    /// 补课时间，接受 `YYYY-MM-DD` 或 RFC3339
    #[schema(example = "2025-07-05")]
    pub rescheduled_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<ClassStatus>,
    pub payment_id: Option<i64>,
    /// 管理员可按学生过滤
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassResponse {
    pub id: i64,
    pub user_id: i64,
    pub payment_id: i64,
    pub date: DateTime<Utc>,
    pub status: ClassStatus,
    pub rescheduled_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<classes::Model> for ClassResponse {
    fn from(c: classes::Model) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            payment_id: c.payment_id,
            date: c.date,
            status: c.status,
            rescheduled_date: c.rescheduled_date,
            notes: c.notes,
            is_active: c.is_active,
            created_at: c.created_at.unwrap_or_else(Utc::now),
        }
    }
}
