use crate::middlewares::{current_auth, require_admin};
use crate::models::*;
use crate::services::ClassSummaryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/class-summaries",
    tag = "class-summaries",
    request_body = CreateClassSummaryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建课程小结成功", body = ClassSummaryResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn create_class_summary(
    class_summary_service: web::Data<ClassSummaryService>,
    req: HttpRequest,
    request: web::Json<CreateClassSummaryRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match class_summary_service
        .create_summary(request.into_inner())
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/class-summaries",
    tag = "class-summaries",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("user_id" = Option<i64>, Query, description = "按学生过滤（仅管理员）"),
        ("class_id" = Option<i64>, Query, description = "按课程过滤")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程小结列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_class_summaries(
    class_summary_service: web::Data<ClassSummaryService>,
    req: HttpRequest,
    query: web::Query<ClassSummaryQuery>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_summary_service
        .list_summaries(auth.user_id, auth.is_admin(), &query.into_inner())
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
    path = "/class-summaries/{id}",
    tag = "class-summaries",
    params(
        ("id" = i64, Path, description = "小结ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程小结成功", body = ClassSummaryResponse),
        (status = 404, description = "课程小结不存在")
    )
)]
pub async fn get_class_summary(
    class_summary_service: web::Data<ClassSummaryService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match class_summary_service
        .get_summary(path.into_inner(), auth.user_id, auth.is_admin())
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/class-summaries/{id}",
    tag = "class-summaries",
    params(
        ("id" = i64, Path, description = "小结ID")
    ),
    request_body = UpdateClassSummaryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新课程小结成功", body = ClassSummaryResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "课程小结不存在")
    )
)]
pub async fn update_class_summary(
    class_summary_service: web::Data<ClassSummaryService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateClassSummaryRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match class_summary_service
        .update_summary(path.into_inner(), request.into_inner())
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/class-summaries/{id}",
    tag = "class-summaries",
    params(
        ("id" = i64, Path, description = "小结ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "停用课程小结成功"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "课程小结不存在")
    )
)]
pub async fn delete_class_summary(
    class_summary_service: web::Data<ClassSummaryService>,
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

    match class_summary_service.delete_summary(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Class summary deactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn class_summary_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/class-summaries")
            .route("", web::post().to(create_class_summary))
            .route("", web::get().to(list_class_summaries))
            .route("/{id}", web::get().to(get_class_summary))
            .route("/{id}", web::put().to(update_class_summary))
            .route("/{id}", web::delete().to(delete_class_summary)),
    );
}
