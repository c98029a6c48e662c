use crate::entities::class_summary_entity as class_summaries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClassSummaryRequest {
    pub class_id: i64,
    #[schema(example = "本节课完成了第一乐章的识谱")]
    pub content: String,
    #[schema(example = "每天慢速练习第 1-16 小节")]
    pub homework: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateClassSummaryRequest {
    pub content: Option<String>,
    pub homework: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassSummaryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// 管理员可按学生过滤
    pub user_id: Option<i64>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassSummaryResponse {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub content: String,
    pub homework: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<class_summaries::Model> for ClassSummaryResponse {
    fn from(cs: class_summaries::Model) -> Self {
        Self {
            id: cs.id,
            class_id: cs.class_id,
            user_id: cs.user_id,
            content: cs.content,
            homework: cs.homework,
            is_active: cs.is_active,
            created_at: cs.created_at.unwrap_or_else(Utc::now),
        }
    }
}
