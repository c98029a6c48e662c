use crate::entities::sheet_entity as sheets;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSheetRequest {
    #[schema(example = "Nocturne Op.9 No.2")]
    pub title: String,
    #[schema(example = "Chopin")]
    pub composer: Option<String>,
    /// 省略时归入 uncategorized
    #[schema(example = "romantic")]
    pub category: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSheetRequest {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub category: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SheetQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SheetResponse {
    pub id: i64,
    pub title: String,
    pub composer: Option<String>,
    pub category: String,
    pub source_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<sheets::Model> for SheetResponse {
    fn from(s: sheets::Model) -> Self {
        Self {
            id: s.id,
            title: s.title,
            composer: s.composer,
            category: s.category,
            source_url: s.source_url,
            is_active: s.is_active,
            created_at: s.created_at.unwrap_or_else(Utc::now),
        }
    }
}
