use crate::entities::sheet_entity as sheets;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

const DEFAULT_CATEGORY: &str = "uncategorized";

/// 分类缺省或全空白时归入 uncategorized，其余去首尾空白
fn resolve_category(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

#[derive(Clone)]
pub struct SheetService {
    pool: DatabaseConnection,
}

impl SheetService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 分页查询曲谱，支持按分类过滤
    pub async fn list_sheets(
        &self,
        query: &SheetQuery,
    ) -> AppResult<PaginatedResponse<SheetResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query = sheets::Entity::find().filter(sheets::Column::IsActive.eq(true));
        if let Some(category) = &query.category {
            base_query = base_query.filter(sheets::Column::Category.eq(category.clone()));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(sheets::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<SheetResponse> = models.into_iter().map(SheetResponse::from).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_sheet(&self, sheet_id: i64) -> AppResult<SheetResponse> {
        let sheet = sheets::Entity::find_by_id(sheet_id)
            .filter(sheets::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Sheet not found".to_string()))?;
        Ok(SheetResponse::from(sheet))
    }

    /// 新建曲谱，分类缺省归入 uncategorized
    pub async fn create_sheet(&self, request: CreateSheetRequest) -> AppResult<SheetResponse> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let category = resolve_category(request.category.as_deref());

        let sheet = sheets::ActiveModel {
            title: Set(title),
            composer: Set(request.composer.clone()),
            category: Set(category),
            source_url: Set(request.source_url.clone()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(SheetResponse::from(sheet))
    }

    pub async fn update_sheet(
        &self,
        sheet_id: i64,
        request: UpdateSheetRequest,
    ) -> AppResult<SheetResponse> {
        let sheet = sheets::Entity::find_by_id(sheet_id)
            .filter(sheets::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Sheet not found".to_string()))?;

        let mut model = sheet.into_active_model();
        if let Some(title) = &request.title {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(AppError::ValidationError(
                    "Title must not be empty".to_string(),
                ));
            }
            model.title = Set(trimmed.to_string());
        }
        if let Some(composer) = &request.composer {
            model.composer = Set(Some(composer.clone()));
        }
        if let Some(category) = &request.category {
            model.category = Set(resolve_category(Some(category.as_str())));
        }
        if let Some(url) = &request.source_url {
            model.source_url = Set(Some(url.clone()));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(SheetResponse::from(updated))
    }

    /// 软删除曲谱，已有的收藏记录保留
    pub async fn delete_sheet(&self, sheet_id: i64) -> AppResult<()> {
        let sheet = sheets::Entity::find_by_id(sheet_id)
            .filter(sheets::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Sheet not found".to_string()))?;

        let mut model = sheet.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_category_defaults() {
        assert_eq!(resolve_category(None), "uncategorized");
        assert_eq!(resolve_category(Some("")), "uncategorized");
        assert_eq!(resolve_category(Some("   ")), "uncategorized");
    }

    #[test]
    fn test_resolve_category_trims() {
        assert_eq!(resolve_category(Some(" romantic ")), "romantic");
        assert_eq!(resolve_category(Some("etude")), "etude");
    }
}
