use crate::entities::{UserRole, user_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
    #[schema(example = "王小雨")]
    pub name: String,
    #[schema(example = "lesson2024")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
    #[schema(example = "lesson2024")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "王小雨")]
    pub name: Option<String>,
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(u: users::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// 学生学习情况统计
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatistics {
    pub total_classes: i64,
    pub classes_taken: i64,
    pub classes_not_started: i64,
    pub total_paid_cents: i64,
    pub total_study_minutes: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub statistics: UserStatistics,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// 管理端运营概览
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOverview {
    pub active_students: i64,
    pub active_payments: i64,
    pub revenue_cents: i64,
    pub classes_this_month: i64,
    pub not_started_classes: i64,
}
