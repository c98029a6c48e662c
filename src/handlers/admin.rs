use crate::middlewares::{current_auth, require_admin};
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户列表成功"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match user_service.list_users(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "用户ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户详情成功", body = ProfileResponse),
        (status = 403, description = "非管理员"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match user_service.get_user_profile(path.into_inner()).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "用户ID")
    ),
    request_body = AdminUpdateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新用户成功", body = UserResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AdminUpdateUserRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match user_service
        .admin_update_user(path.into_inner(), request.into_inner())
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
    get,
    path = "/admin/overview",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取运营概览成功", body = AdminOverview),
        (status = 403, description = "非管理员")
    )
)]
pub async fn get_overview(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match user_service.get_admin_overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": overview
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_users))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/overview", web::get().to(get_overview)),
    );
}
