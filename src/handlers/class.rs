use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::ClassService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/classes",
    tag = "classes",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("status" = Option<String>, Query, description = "按课程状态过滤"),
        ("payment_id" = Option<i64>, Query, description = "按缴费过滤"),
        ("user_id" = Option<i64>, Query, description = "按学生过滤（仅管理员）")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_classes(
    class_service: web::Data<ClassService>,
    req: HttpRequest,
    query: web::Query<ClassQuery>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_service
        .list_classes(auth.user_id, auth.is_admin(), &query.into_inner())
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
    get,
    path = "/classes/{id}",
    tag = "classes",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程详情成功", body = ClassResponse),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn get_class(
    class_service: web::Data<ClassService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_service
        .get_class(path.into_inner(), auth.user_id, auth.is_admin())
        .await
    {
        Ok(class) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": class
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/classes/{id}",
    tag = "classes",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    request_body = UpdateClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新课程成功", body = ClassResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn update_class(
    class_service: web::Data<ClassService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateClassRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_service
        .update_class(
            path.into_inner(),
            auth.user_id,
            auth.is_admin(),
            request.into_inner(),
        )
        .await
    {
        Ok(class) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": class
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/classes/{id}",
    tag = "classes",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "停用课程成功"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn delete_class(
    class_service: web::Data<ClassService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_service
        .delete_class(path.into_inner(), auth.user_id, auth.is_admin())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Class deactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn class_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/classes")
            .route("", web::get().to(list_classes))
            .route("/{id}", web::get().to(get_class))
            .route("/{id}", web::put().to(update_class))
            .route("/{id}", web::delete().to(delete_class)),
    );
}
