use crate::entities::payment_entity as payments;
use crate::models::class::ClassResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub user_id: i64,
    #[schema(example = 24000)]
    pub amount_cents: i64,
    /// 计费周期开始日，接受 `YYYY-MM-DD` 或 RFC3339
    #[schema(example = "2025-06-20")]
    pub billing_start: Option<String>,
    /// 计费周期结束日（含）
    #[schema(example = "2025-07-11")]
    pub billing_end: Option<String>,
    pub invoice_url: Option<String>,
    pub paid_at: Option<String>,
    /// 显式指定课程日期时优先于计费周期
    pub class_dates: Option<Vec<String>>,
}

/// 所有字段可选，省略表示保持不变
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount_cents: Option<i64>,
    #[schema(example = "2025-06-27")]
    pub billing_start: Option<String>,
    #[schema(example = "2025-08-01")]
    pub billing_end: Option<String>,
    pub invoice_url: Option<String>,
    pub paid_at: Option<String>,
    pub class_dates: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// 管理员可按学生过滤
    pub user_id: Option<i64>,
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount_cents: i64,
    pub billing_start: Option<DateTime<Utc>>,
    pub billing_end: Option<DateTime<Utc>>,
    pub invoice_url: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(p: payments::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            amount_cents: p.amount_cents,
            billing_start: p.billing_start,
            billing_end: p.billing_end,
            invoice_url: p.invoice_url,
            paid_at: p.paid_at,
            is_active: p.is_active,
            created_at: p.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentWithClassesResponse {
    pub payment: PaymentResponse,
    pub classes: Vec<ClassResponse>,
}
