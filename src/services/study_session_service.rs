use crate::entities::{
    class_entity as classes, study_session_entity as study_sessions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::NotificationService;
use crate::utils::{normalize_midday, parse_lesson_date};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 时长缺省 0 分钟，备注缺省为空串
fn session_defaults(duration_minutes: Option<i32>, comments: Option<&str>) -> (i32, String) {
    (
        duration_minutes.unwrap_or(0),
        comments.unwrap_or_default().to_string(),
    )
}

#[derive(Clone)]
pub struct StudySessionService {
    pool: DatabaseConnection,
    notification_service: NotificationService,
}

impl StudySessionService {
    pub fn new(pool: DatabaseConnection, notification_service: NotificationService) -> Self {
        Self {
            pool,
            notification_service,
        }
    }

    /// 当前用户的练习记录
    pub async fn list_sessions(
        &self,
        user_id: i64,
        query: &StudySessionQuery,
    ) -> AppResult<PaginatedResponse<StudySessionResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query = study_sessions::Entity::find()
            .filter(study_sessions::Column::UserId.eq(user_id))
            .filter(study_sessions::Column::IsActive.eq(true));
        if let Some(class_id) = query.class_id {
            base_query = base_query.filter(study_sessions::Column::ClassId.eq(class_id));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(study_sessions::Column::SessionDate)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<StudySessionResponse> = models
            .into_iter()
            .map(StudySessionResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// 记录一次练习；日期缺省为今天，时长缺省 0 分钟，备注缺省为空
    pub async fn create_session(
        &self,
        user_id: i64,
        request: CreateStudySessionRequest,
    ) -> AppResult<StudySessionResponse> {
        if let Some(class_id) = request.class_id {
            self.verify_class_ownership(class_id, user_id).await?;
        }

        let session_date = match &request.session_date {
            Some(raw) => parse_lesson_date(raw)?,
            None => normalize_midday(Utc::now()),
        };

        let (duration_minutes, comments) =
            session_defaults(request.duration_minutes, request.comments.as_deref());
        if duration_minutes < 0 {
            return Err(AppError::ValidationError(
                "Duration must not be negative".to_string(),
            ));
        }

        let session = study_sessions::ActiveModel {
            user_id: Set(user_id),
            class_id: Set(request.class_id),
            session_date: Set(session_date),
            duration_minutes: Set(duration_minutes),
            comments: Set(comments),
            is_shared: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(StudySessionResponse::from(session))
    }

    pub async fn get_session(
        &self,
        session_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<StudySessionResponse> {
        let session = self
            .load_session(session_id, viewer_id, viewer_is_admin)
            .await?;
        Ok(StudySessionResponse::from(session))
    }

    pub async fn update_session(
        &self,
        session_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
        request: UpdateStudySessionRequest,
    ) -> AppResult<StudySessionResponse> {
        let session = self
            .load_session(session_id, viewer_id, viewer_is_admin)
            .await?;

        if let Some(class_id) = request.class_id {
            self.verify_class_ownership(class_id, session.user_id).await?;
        }

        let session_date = match &request.session_date {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => None,
        };

        let mut model = session.into_active_model();
        if let Some(class_id) = request.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(date) = session_date {
            model.session_date = Set(date);
        }
        if let Some(duration) = request.duration_minutes {
            if duration < 0 {
                return Err(AppError::ValidationError(
                    "Duration must not be negative".to_string(),
                ));
            }
            model.duration_minutes = Set(duration);
        }
        if let Some(comments) = &request.comments {
            model.comments = Set(comments.clone());
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(StudySessionResponse::from(updated))
    }

    pub async fn delete_session(
        &self,
        session_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<()> {
        let session = self
            .load_session(session_id, viewer_id, viewer_is_admin)
            .await?;

        let mut model = session.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        Ok(())
    }

    /// 分享练习记录给老师
    ///
    /// 1. 只有记录本人可以分享
    /// 2. 重复分享不会再次发通知
    /// 3. 通知失败只记日志，分享本身照常成功
    pub async fn share_session(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> AppResult<StudySessionResponse> {
        let session = study_sessions::Entity::find_by_id(session_id)
            .filter(study_sessions::Column::UserId.eq(user_id))
            .filter(study_sessions::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Study session not found".to_string()))?;

        if session.is_shared {
            return Ok(StudySessionResponse::from(session));
        }

        let mut model = session.into_active_model();
        model.is_shared = Set(true);
        model.updated_at = Set(Some(Utc::now()));
        let shared = model.update(&self.pool).await?;

        let student_name = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| format!("Student {user_id}"));
        let message = format!("{student_name} shared a study session");

        if let Err(e) = self
            .notification_service
            .notify_admins(&message, Some(shared.id))
            .await
        {
            log::warn!("Failed to notify admins about shared study session {session_id}: {e}");
        }

        Ok(StudySessionResponse::from(shared))
    }

    async fn verify_class_ownership(&self, class_id: i64, user_id: i64) -> AppResult<()> {
        let class = classes::Entity::find_by_id(class_id)
            .filter(classes::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?;
        match class {
            Some(c) if c.user_id == user_id => Ok(()),
            _ => Err(AppError::ValidationError(
                "Class not found or not owned by user".to_string(),
            )),
        }
    }

    async fn load_session(
        &self,
        session_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<study_sessions::Model> {
        let session = study_sessions::Entity::find_by_id(session_id)
            .filter(study_sessions::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Study session not found".to_string()))?;

        if !viewer_is_admin && session.user_id != viewer_id {
            return Err(AppError::NotFound("Study session not found".to_string()));
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults_applied_when_absent() {
        assert_eq!(session_defaults(None, None), (0, String::new()));
    }

    #[test]
    fn test_session_defaults_pass_through() {
        assert_eq!(
            session_defaults(Some(45), Some("练习了左手琶音")),
            (45, "练习了左手琶音".to_string())
        );
    }
}
