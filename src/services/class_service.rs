use crate::entities::class_entity as classes;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::parse_lesson_date;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct ClassService {
    pool: DatabaseConnection,
}

impl ClassService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 分页查询课程；学生限定自己的课程，管理员可看全部并按学生过滤
    pub async fn list_classes(
        &self,
        viewer_id: i64,
        viewer_is_admin: bool,
        query: &ClassQuery,
    ) -> AppResult<PaginatedResponse<ClassResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query = classes::Entity::find().filter(classes::Column::IsActive.eq(true));
        if viewer_is_admin {
            if let Some(user_id) = query.user_id {
                base_query = base_query.filter(classes::Column::UserId.eq(user_id));
            }
        } else {
            base_query = base_query.filter(classes::Column::UserId.eq(viewer_id));
        }
        if let Some(status) = query.status {
            base_query = base_query.filter(classes::Column::Status.eq(status));
        }
        if let Some(payment_id) = query.payment_id {
            base_query = base_query.filter(classes::Column::PaymentId.eq(payment_id));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_asc(classes::Column::Date)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<ClassResponse> = models.into_iter().map(ClassResponse::from).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_class(
        &self,
        class_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<ClassResponse> {
        let class = self
            .load_class(class_id, viewer_id, viewer_is_admin)
            .await?;
        Ok(ClassResponse::from(class))
    }

    /// 更新课程状态、补课时间或备注；状态之间可自由流转
    pub async fn update_class(
        &self,
        class_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
        request: UpdateClassRequest,
    ) -> AppResult<ClassResponse> {
        if request.status.is_none() && request.rescheduled_date.is_none() && request.notes.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let rescheduled_date = match &request.rescheduled_date {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => None,
        };

        let class = self
            .load_class(class_id, viewer_id, viewer_is_admin)
            .await?;

        let mut model = class.into_active_model();
        if let Some(status) = request.status {
            model.status = Set(status);
        }
        if let Some(date) = rescheduled_date {
            model.rescheduled_date = Set(Some(date));
        }
        if let Some(notes) = &request.notes {
            model.notes = Set(notes.clone());
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(ClassResponse::from(updated))
    }

    /// 软删除单节课程
    pub async fn delete_class(
        &self,
        class_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<()> {
        let class = self
            .load_class(class_id, viewer_id, viewer_is_admin)
            .await?;

        let mut model = class.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }

    async fn load_class(
        &self,
        class_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<classes::Model> {
        let class = classes::Entity::find_by_id(class_id)
            .filter(classes::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        if !viewer_is_admin && class.user_id != viewer_id {
            return Err(AppError::NotFound("Class not found".to_string()));
        }

        Ok(class)
    }
}
