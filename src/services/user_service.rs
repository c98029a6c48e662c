use crate::entities::{
    ClassStatus, UserRole, class_entity as classes, payment_entity as payments,
    sheet_entity as sheets, study_session_entity as study_sessions,
    user_entity as users, user_favorite_entity as user_favorites,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{month_bounds_utc, normalize_email, validate_email};
use crate::utils::{hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取用户资料和学习统计
    pub async fn get_user_profile(&self, user_id: i64) -> AppResult<ProfileResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let statistics = self.get_user_statistics(user_id).await?;

        Ok(ProfileResponse {
            user: UserResponse::from(user),
            statistics,
        })
    }

    /// 更新用户资料
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        if request.name.is_none() && request.email.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let name = match &request.name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.len() > 100 {
                    return Err(AppError::ValidationError(
                        "Name length must be between 1 and 100 characters".to_string(),
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let email = match &request.email {
            Some(raw) => {
                let normalized = normalize_email(raw);
                validate_email(&normalized)?;
                // 换邮箱时检查是否已被其他账号占用
                let taken = users::Entity::find()
                    .filter(users::Column::Email.eq(normalized.clone()))
                    .filter(users::Column::Id.ne(user_id))
                    .one(&self.pool)
                    .await?;
                if taken.is_some() {
                    return Err(AppError::ValidationError(
                        "Email already registered".to_string(),
                    ));
                }
                Some(normalized)
            }
            None => None,
        };

        let mut model = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .into_active_model();
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(email) = email {
            model.email = Set(email);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(UserResponse::from(updated))
    }

    /// 修改密码，需要先验证当前密码
    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let is_valid = verify_password(&request.current_password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError(
                "Current password is incorrect".to_string(),
            ));
        }

        validate_password(&request.new_password)?;
        let password_hash = hash_password(&request.new_password)?;

        let mut model = user.into_active_model();
        model.password_hash = Set(password_hash);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }

    /// 收藏列表
    pub async fn get_favorites(&self, user_id: i64) -> AppResult<Vec<SheetResponse>> {
        let favorites = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .order_by_desc(user_favorites::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let sheet_ids: Vec<i64> = favorites.iter().map(|f| f.sheet_id).collect();
        if sheet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = sheets::Entity::find()
            .filter(sheets::Column::Id.is_in(sheet_ids))
            .filter(sheets::Column::IsActive.eq(true))
            .all(&self.pool)
            .await?;

        Ok(models.into_iter().map(SheetResponse::from).collect())
    }

    /// 收藏曲谱，重复收藏视为成功
    pub async fn add_favorite(&self, user_id: i64, sheet_id: i64) -> AppResult<()> {
        let sheet = sheets::Entity::find_by_id(sheet_id)
            .filter(sheets::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?;
        if sheet.is_none() {
            return Err(AppError::NotFound("Sheet not found".to_string()));
        }

        let existing = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::SheetId.eq(sheet_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        user_favorites::ActiveModel {
            user_id: Set(user_id),
            sheet_id: Set(sheet_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(())
    }

    /// 取消收藏，不存在的收藏同样返回成功
    pub async fn remove_favorite(&self, user_id: i64, sheet_id: i64) -> AppResult<()> {
        user_favorites::Entity::delete_many()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::SheetId.eq(sheet_id))
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// 管理员分页查询用户
    pub async fn list_users(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let base_query = users::Entity::find();

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(users::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<UserResponse> = models.into_iter().map(UserResponse::from).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// 管理员修改用户资料、角色或启用状态
    pub async fn admin_update_user(
        &self,
        user_id: i64,
        request: AdminUpdateUserRequest,
    ) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut model = user.into_active_model();
        if let Some(name) = &request.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::ValidationError(
                    "Name must not be empty".to_string(),
                ));
            }
            model.name = Set(trimmed.to_string());
        }
        if let Some(role) = request.role {
            model.role = Set(role);
        }
        if let Some(is_active) = request.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(UserResponse::from(updated))
    }

    /// 管理端运营概览
    pub async fn get_admin_overview(&self) -> AppResult<AdminOverview> {
        let active_students = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Regular))
            .filter(users::Column::IsActive.eq(true))
            .count(&self.pool)
            .await? as i64;

        let active_payments = payments::Entity::find()
            .filter(payments::Column::IsActive.eq(true))
            .count(&self.pool)
            .await? as i64;

        // Postgres 对 bigint 求和返回 numeric，这里显式转回 bigint
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct RevenueRow {
            revenue: Option<i64>,
        }
        let revenue_cents = payments::Entity::find()
            .filter(payments::Column::IsActive.eq(true))
            .select_only()
            .column_as(
                Expr::col(payments::Column::AmountCents)
                    .sum()
                    .cast_as(Alias::new("bigint")),
                "revenue",
            )
            .into_model::<RevenueRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.revenue)
            .unwrap_or(0);

        let (month_start, month_end) = month_bounds_utc(Utc::now());
        let classes_this_month = classes::Entity::find()
            .filter(classes::Column::IsActive.eq(true))
            .filter(classes::Column::Date.gte(month_start))
            .filter(classes::Column::Date.lt(month_end))
            .count(&self.pool)
            .await? as i64;

        let not_started_classes = classes::Entity::find()
            .filter(classes::Column::IsActive.eq(true))
            .filter(classes::Column::Status.eq(ClassStatus::NotStarted))
            .count(&self.pool)
            .await? as i64;

        Ok(AdminOverview {
            active_students,
            active_payments,
            revenue_cents,
            classes_this_month,
            not_started_classes,
        })
    }

    /// 学习统计：课程状态分布、累计缴费、累计练习时长
    async fn get_user_statistics(&self, user_id: i64) -> AppResult<UserStatistics> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct StatusCountRow {
            status: ClassStatus,
            count: i64,
        }
        let status_rows = classes::Entity::find()
            .filter(classes::Column::UserId.eq(user_id))
            .filter(classes::Column::IsActive.eq(true))
            .select_only()
            .column(classes::Column::Status)
            .column_as(Expr::val(1).count(), "count")
            .group_by(classes::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.pool)
            .await?;

        let mut total_classes = 0i64;
        let mut classes_taken = 0i64;
        let mut classes_not_started = 0i64;
        for row in status_rows {
            total_classes += row.count;
            match row.status {
                ClassStatus::Taken => classes_taken += row.count,
                ClassStatus::NotStarted => classes_not_started += row.count,
                _ => {}
            }
        }

        #[derive(Debug, sea_orm::FromQueryResult)]
        struct PaidRow {
            total_paid: Option<i64>,
        }
        let total_paid_cents = payments::Entity::find()
            .filter(payments::Column::UserId.eq(user_id))
            .filter(payments::Column::IsActive.eq(true))
            .select_only()
            .column_as(
                Expr::col(payments::Column::AmountCents)
                    .sum()
                    .cast_as(Alias::new("bigint")),
                "total_paid",
            )
            .into_model::<PaidRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.total_paid)
            .unwrap_or(0);

        #[derive(Debug, sea_orm::FromQueryResult)]
        struct StudyRow {
            total_minutes: Option<i64>,
        }
        let total_study_minutes = study_sessions::Entity::find()
            .filter(study_sessions::Column::UserId.eq(user_id))
            .filter(study_sessions::Column::IsActive.eq(true))
            .select_only()
            .column_as(
                Expr::col(study_sessions::Column::DurationMinutes)
                    .sum()
                    .cast_as(Alias::new("bigint")),
                "total_minutes",
            )
            .into_model::<StudyRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.total_minutes)
            .unwrap_or(0);

        Ok(UserStatistics {
            total_classes,
            classes_taken,
            classes_not_started,
            total_paid_cents,
            total_study_minutes,
        })
    }
}
