use crate::entities::{
    UserRole, notification_entity as notifications, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 给所有启用中的管理员发一条站内通知，返回发出的条数
    pub async fn notify_admins(
        &self,
        message: &str,
        study_session_id: Option<i64>,
    ) -> AppResult<u64> {
        let admins = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin))
            .filter(users::Column::IsActive.eq(true))
            .all(&self.pool)
            .await?;

        if admins.is_empty() {
            return Ok(0);
        }

        let rows: Vec<notifications::ActiveModel> = admins
            .iter()
            .map(|admin| notifications::ActiveModel {
                user_id: Set(admin.id),
                message: Set(message.to_string()),
                study_session_id: Set(study_session_id),
                is_read: Set(false),
                ..Default::default()
            })
            .collect();
        let count = rows.len() as u64;
        notifications::Entity::insert_many(rows)
            .exec(&self.pool)
            .await?;

        Ok(count)
    }

    /// 当前用户的通知列表，可只看未读
    pub async fn list_notifications(
        &self,
        user_id: i64,
        query: &NotificationQuery,
    ) -> AppResult<PaginatedResponse<NotificationResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query =
            notifications::Entity::find().filter(notifications::Column::UserId.eq(user_id));
        if query.unread_only.unwrap_or(false) {
            base_query = base_query.filter(notifications::Column::IsRead.eq(false));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<NotificationResponse> = models
            .into_iter()
            .map(NotificationResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// 标记单条通知已读
    pub async fn mark_read(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> AppResult<NotificationResponse> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.is_read {
            return Ok(NotificationResponse::from(notification));
        }

        let mut model = notification.into_active_model();
        model.is_read = Set(true);
        let updated = model.update(&self.pool).await?;

        Ok(NotificationResponse::from(updated))
    }

    /// 全部标记已读，返回受影响的条数
    pub async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}
