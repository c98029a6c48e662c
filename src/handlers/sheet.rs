use crate::middlewares::{current_auth, require_admin};
use crate::models::*;
use crate::services::SheetService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/sheets",
    tag = "sheets",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("category" = Option<String>, Query, description = "按分类过滤")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取乐谱列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_sheets(
    sheet_service: web::Data<SheetService>,
    req: HttpRequest,
    query: web::Query<SheetQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match sheet_service.list_sheets(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sheets/{id}",
    tag = "sheets",
    params(
        ("id" = i64, Path, description = "乐谱ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取乐谱详情成功", body = SheetResponse),
        (status = 404, description = "乐谱不存在")
    )
)]
pub async fn get_sheet(
    sheet_service: web::Data<SheetService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match sheet_service.get_sheet(path.into_inner()).await {
        Ok(sheet) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": sheet
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sheets",
    tag = "sheets",
    request_body = CreateSheetRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建乐谱成功", body = SheetResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn create_sheet(
    sheet_service: web::Data<SheetService>,
    req: HttpRequest,
    request: web::Json<CreateSheetRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match sheet_service.create_sheet(request.into_inner()).await {
        Ok(sheet) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": sheet
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/sheets/{id}",
    tag = "sheets",
    params(
        ("id" = i64, Path, description = "乐谱ID")
    ),
    request_body = UpdateSheetRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新乐谱成功", body = SheetResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "乐谱不存在")
    )
)]
pub async fn update_sheet(
    sheet_service: web::Data<SheetService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateSheetRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match sheet_service
        .update_sheet(path.into_inner(), request.into_inner())
        .await
    {
        Ok(sheet) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": sheet
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/sheets/{id}",
    tag = "sheets",
    params(
        ("id" = i64, Path, description = "乐谱ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "停用乐谱成功"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "乐谱不存在")
    )
)]
pub async fn delete_sheet(
    sheet_service: web::Data<SheetService>,
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

    match sheet_service.delete_sheet(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Sheet deactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn sheet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sheets")
            .route("", web::get().to(list_sheets))
            .route("", web::post().to(create_sheet))
            .route("/{id}", web::get().to(get_sheet))
            .route("/{id}", web::put().to(update_sheet))
            .route("/{id}", web::delete().to(delete_sheet)),
    );
}
