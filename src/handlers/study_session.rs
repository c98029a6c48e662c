use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::StudySessionService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/study-sessions",
    tag = "study-sessions",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("class_id" = Option<i64>, Query, description = "按课程过滤")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取练习记录列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_study_sessions(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    query: web::Query<StudySessionQuery>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .list_sessions(auth.user_id, &query.into_inner())
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
    post,
    path = "/study-sessions",
    tag = "study-sessions",
    request_body = CreateStudySessionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建练习记录成功", body = StudySessionResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn create_study_session(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    request: web::Json<CreateStudySessionRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .create_session(auth.user_id, request.into_inner())
        .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/study-sessions/{id}",
    tag = "study-sessions",
    params(
        ("id" = i64, Path, description = "练习记录ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取练习记录成功", body = StudySessionResponse),
        (status = 404, description = "练习记录不存在")
    )
)]
pub async fn get_study_session(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .get_session(path.into_inner(), auth.user_id, auth.is_admin())
        .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/study-sessions/{id}",
    tag = "study-sessions",
    params(
        ("id" = i64, Path, description = "练习记录ID")
    ),
    request_body = UpdateStudySessionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新练习记录成功", body = StudySessionResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "练习记录不存在")
    )
)]
pub async fn update_study_session(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateStudySessionRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .update_session(
            path.into_inner(),
            auth.user_id,
            auth.is_admin(),
            request.into_inner(),
        )
        .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/study-sessions/{id}",
    tag = "study-sessions",
    params(
        ("id" = i64, Path, description = "练习记录ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除练习记录成功"),
        (status = 404, description = "练习记录不存在")
    )
)]
pub async fn delete_study_session(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .delete_session(path.into_inner(), auth.user_id, auth.is_admin())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Study session deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/study-sessions/{id}/share",
    tag = "study-sessions",
    params(
        ("id" = i64, Path, description = "练习记录ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分享练习记录成功", body = StudySessionResponse),
        (status = 404, description = "练习记录不存在")
    )
)]
pub async fn share_study_session(
    study_session_service: web::Data<StudySessionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match study_session_service
        .share_session(path.into_inner(), auth.user_id)
        .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn study_session_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/study-sessions")
            .route("", web::get().to(list_study_sessions))
            .route("", web::post().to(create_study_session))
            .route("/{id}", web::get().to(get_study_session))
            .route("/{id}", web::put().to(update_study_session))
            .route("/{id}", web::delete().to(delete_study_session))
            .route("/{id}/share", web::post().to(share_study_session)),
    );
}
