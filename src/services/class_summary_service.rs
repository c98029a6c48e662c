use crate::entities::{class_entity as classes, class_summary_entity as class_summaries};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct ClassSummaryService {
    pool: DatabaseConnection,
}

impl ClassSummaryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 老师给某节课写课堂小结，学生归属取自课程本身
    pub async fn create_summary(
        &self,
        request: CreateClassSummaryRequest,
    ) -> AppResult<ClassSummaryResponse> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::ValidationError(
                "Content must not be empty".to_string(),
            ));
        }

        let class = classes::Entity::find_by_id(request.class_id)
            .filter(classes::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        let summary = class_summaries::ActiveModel {
            class_id: Set(class.id),
            user_id: Set(class.user_id),
            content: Set(content),
            homework: Set(request.homework.clone()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(ClassSummaryResponse::from(summary))
    }

    /// 学生看自己的课堂小结；管理员可看全部并按学生或课程过滤
    pub async fn list_summaries(
        &self,
        viewer_id: i64,
        viewer_is_admin: bool,
        query: &ClassSummaryQuery,
    ) -> AppResult<PaginatedResponse<ClassSummaryResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query =
            class_summaries::Entity::find().filter(class_summaries::Column::IsActive.eq(true));
        if viewer_is_admin {
            if let Some(user_id) = query.user_id {
                base_query = base_query.filter(class_summaries::Column::UserId.eq(user_id));
            }
        } else {
            base_query = base_query.filter(class_summaries::Column::UserId.eq(viewer_id));
        }
        if let Some(class_id) = query.class_id {
            base_query = base_query.filter(class_summaries::Column::ClassId.eq(class_id));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(class_summaries::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<ClassSummaryResponse> = models
            .into_iter()
            .map(ClassSummaryResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_summary(
        &self,
        summary_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<ClassSummaryResponse> {
        let summary = class_summaries::Entity::find_by_id(summary_id)
            .filter(class_summaries::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class summary not found".to_string()))?;

        if !viewer_is_admin && summary.user_id != viewer_id {
            return Err(AppError::NotFound("Class summary not found".to_string()));
        }

        Ok(ClassSummaryResponse::from(summary))
    }

    pub async fn update_summary(
        &self,
        summary_id: i64,
        request: UpdateClassSummaryRequest,
    ) -> AppResult<ClassSummaryResponse> {
        let summary = class_summaries::Entity::find_by_id(summary_id)
            .filter(class_summaries::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class summary not found".to_string()))?;

        let mut model = summary.into_active_model();
        if let Some(content) = &request.content {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                return Err(AppError::ValidationError(
                    "Content must not be empty".to_string(),
                ));
            }
            model.content = Set(trimmed.to_string());
        }
        if let Some(homework) = &request.homework {
            model.homework = Set(Some(homework.clone()));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(ClassSummaryResponse::from(updated))
    }

    pub async fn delete_summary(&self, summary_id: i64) -> AppResult<()> {
        let summary = class_summaries::Entity::find_by_id(summary_id)
            .filter(class_summaries::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class summary not found".to_string()))?;

        let mut model = summary.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }
}
