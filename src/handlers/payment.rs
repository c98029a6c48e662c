use crate::middlewares::{current_auth, require_admin};
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建缴费成功", body = PaymentWithClassesResponse),
        (status = 400, description = "参数错误或无法生成课程 (CLASSES_REQUIRED)"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "学生不存在")
    )
)]
pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match payment_service.create_payment(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量"),
        ("user_id" = Option<i64>, Query, description = "按学生过滤"),
        ("include_inactive" = Option<bool>, Query, description = "是否包含已停用的缴费")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取缴费列表成功"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match payment_service.list_payments(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/my",
    tag = "payments",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取本人缴费成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn my_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };

    match payment_service.list_user_payments(auth.user_id).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payments
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "缴费ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取缴费详情成功", body = PaymentWithClassesResponse),
        (status = 404, description = "缴费不存在")
    )
)]
pub async fn get_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    let payment_id = path.into_inner();

    match payment_service
        .get_payment(payment_id, auth.user_id, auth.is_admin())
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
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "缴费ID")
    ),
    request_body = UpdatePaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新缴费成功", body = PaymentWithClassesResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "缴费不存在")
    )
)]
pub async fn update_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse> {
    let auth = match current_auth(&req) {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_admin(&auth) {
        return Ok(e.error_response());
    }

    match payment_service
        .update_payment(path.into_inner(), request.into_inner())
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
    delete,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "缴费ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "停用缴费成功，课程一并停用"),
        (status = 403, description = "非管理员"),
        (status = 404, description = "缴费不存在")
    )
)]
pub async fn delete_payment(
    payment_service: web::Data<PaymentService>,
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

    match payment_service.delete_payment(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Payment deactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payments/{id}/restore",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "缴费ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "恢复缴费成功；课程保持停用", body = PaymentResponse),
        (status = 403, description = "非管理员"),
        (status = 404, description = "缴费不存在")
    )
)]
pub async fn restore_payment(
    payment_service: web::Data<PaymentService>,
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

    match payment_service.restore_payment(path.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(create_payment))
            .route("", web::get().to(list_payments))
            .route("/my", web::get().to(my_payments))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}", web::put().to(update_payment))
            .route("/{id}", web::delete().to(delete_payment))
            .route("/{id}/restore", web::post().to(restore_payment)),
    );
}
