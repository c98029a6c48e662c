use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    JwtService, hash_password, normalize_email, validate_email, validate_password, verify_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name must not be empty".to_string(),
            ));
        }

        // 检查邮箱是否已注册
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;

        let user = users::ActiveModel {
            email: Set(email),
            name: Set(name),
            password_hash: Set(password_hash),
            role: Set(UserRole::Regular),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        let is_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        if !user.is_active {
            return Err(AppError::AuthError("Account is disabled".to_string()));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError("Account is disabled".to_string()));
        }

        // 只换发访问令牌，刷新令牌原样返回
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    /// 启动时根据配置确保管理员账号存在，已存在则不做任何修改
    pub async fn ensure_admin(&self, email: &str, password: &str, name: &str) -> AppResult<()> {
        let email = normalize_email(email);
        validate_email(&email)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;

        users::ActiveModel {
            email: Set(email.clone()),
            name: Set(name.to_string()),
            password_hash: Set(password_hash),
            role: Set(UserRole::Admin),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Seeded admin account {}", email);
        Ok(())
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, user.role)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
