use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户资料成功", body = ProfileResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service.get_user_profile(auth.user_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "user",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新用户资料成功", body = UserResponse),
        (status = 401, description = "未授权"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service
        .update_profile(auth.user_id, request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/user/password",
    tag = "user",
    request_body = ChangePasswordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "修改密码成功"),
        (status = 401, description = "当前密码错误"),
        (status = 400, description = "新密码不符合要求")
    )
)]
pub async fn change_password(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service
        .change_password(auth.user_id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password changed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/user/favorites",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取收藏列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_favorites(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service.get_favorites(auth.user_id).await {
        Ok(sheets) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": sheets
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/user/favorites/{sheet_id}",
    tag = "user",
    params(
        ("sheet_id" = i64, Path, description = "曲谱ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "收藏成功"),
        (status = 404, description = "曲谱不存在")
    )
)]
pub async fn add_favorite(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    let sheet_id = path.into_inner();

    match user_service.add_favorite(auth.user_id, sheet_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Sheet added to favorites"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/user/favorites/{sheet_id}",
    tag = "user",
    params(
        ("sheet_id" = i64, Path, description = "曲谱ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "取消收藏成功")
    )
)]
pub async fn remove_favorite(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    let sheet_id = path.into_inner();

    match user_service.remove_favorite(auth.user_id, sheet_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Sheet removed from favorites"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/password", web::put().to(change_password))
            .route("/favorites", web::get().to(get_favorites))
            .route("/favorites/{sheet_id}", web::post().to(add_favorite))
            .route("/favorites/{sheet_id}", web::delete().to(remove_favorite)),
    );
}
