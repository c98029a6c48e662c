use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("unread_only" = Option<bool>, Query, description = "仅未读")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取通知列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_notifications(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match notification_service
        .list_notifications(auth.user_id, &query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    params(
        ("id" = i64, Path, description = "通知ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "标记已读成功", body = NotificationResponse),
        (status = 404, description = "通知不存在")
    )
)]
pub async fn mark_notification_read(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match notification_service
        .mark_read(path.into_inner(), auth.user_id)
        .await
    {
        Ok(notification) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": notification
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/notifications/read-all",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部标记已读成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn mark_all_notifications_read(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match notification_service.mark_all_read(auth.user_id).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "updated": updated }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/read-all", web::put().to(mark_all_notifications_read))
            .route("/{id}/read", web::put().to(mark_notification_read)),
    );
}
