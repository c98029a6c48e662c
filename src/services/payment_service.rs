use crate::entities::{
    ClassStatus, class_entity as classes, payment_entity as payments, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    ExistingClass, ReconcilePlan, billing_period_changed, parse_lesson_date, plan_explicit_dates,
    plan_period_change, resolve_class_dates,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 缴费与课程编排
///
/// 缴费记录是课程的唯一来源：创建缴费时按账期（或显式日期列表）整批
/// 生成课程；修改账期时对账调整；停用缴费时级联停用课程。
#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建缴费并生成课程
    ///
    /// 1. 显式 class_dates 优先于账期；二者都不可用时课程数为零
    /// 2. 课程数为零时删掉刚插入的缴费记录并报 CLASSES_REQUIRED，
    ///    不允许存在没有课程的缴费
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> AppResult<PaymentWithClassesResponse> {
        if request.amount_cents < 0 {
            return Err(AppError::ValidationError(
                "Amount must not be negative".to_string(),
            ));
        }

        let owner = users::Entity::find_by_id(request.user_id)
            .one(&self.pool)
            .await?;
        if owner.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let billing_start = match &request.billing_start {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => None,
        };
        let billing_end = match &request.billing_end {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => None,
        };
        let paid_at = match &request.paid_at {
            Some(raw) => parse_lesson_date(raw)?,
            None => Utc::now(),
        };

        let explicit_dates: Option<Vec<DateTime<Utc>>> = match &request.class_dates {
            Some(list) => Some(
                list.iter()
                    .map(|raw| parse_lesson_date(raw))
                    .collect::<AppResult<_>>()?,
            ),
            None => None,
        };
        let class_dates = resolve_class_dates(explicit_dates.as_deref(), billing_start, billing_end);

        let payment = payments::ActiveModel {
            user_id: Set(request.user_id),
            amount_cents: Set(request.amount_cents),
            billing_start: Set(billing_start),
            billing_end: Set(billing_end),
            invoice_url: Set(request.invoice_url.clone()),
            paid_at: Set(paid_at),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        if class_dates.is_empty() {
            // 回滚刚插入的缴费记录
            payments::Entity::delete_by_id(payment.id)
                .exec(&self.pool)
                .await?;
            return Err(AppError::ClassesRequired(
                "Payment must result in at least one class".to_string(),
            ));
        }

        let new_classes: Vec<classes::ActiveModel> = class_dates
            .iter()
            .map(|date| classes::ActiveModel {
                user_id: Set(request.user_id),
                payment_id: Set(payment.id),
                date: Set(*date),
                status: Set(ClassStatus::NotStarted),
                notes: Set(String::new()),
                is_active: Set(true),
                ..Default::default()
            })
            .collect();
        classes::Entity::insert_many(new_classes)
            .exec(&self.pool)
            .await?;

        log::info!(
            "Created payment {} for user {} with {} classes",
            payment.id,
            payment.user_id,
            class_dates.len()
        );

        let class_models = self.load_payment_classes(payment.id).await?;
        Ok(PaymentWithClassesResponse {
            payment: PaymentResponse::from(payment),
            classes: class_models.into_iter().map(ClassResponse::from).collect(),
        })
    }

    /// 修改缴费，必要时对课程做对账调整
    ///
    /// 对账模式的优先级:
    /// 1. 带 class_dates 走显式列表模式，与账期是否变化无关；空列表直接拒绝
    /// 2. 否则账期（按日历日）有变化时按新账期重新生成，要求起止齐全
    /// 3. 否则完全不动课程
    pub async fn update_payment(
        &self,
        payment_id: i64,
        request: UpdatePaymentRequest,
    ) -> AppResult<PaymentWithClassesResponse> {
        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if let Some(amount) = request.amount_cents {
            if amount < 0 {
                return Err(AppError::ValidationError(
                    "Amount must not be negative".to_string(),
                ));
            }
        }

        // 省略的账期字段表示保持不变
        let next_start = match &request.billing_start {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => payment.billing_start,
        };
        let next_end = match &request.billing_end {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => payment.billing_end,
        };
        let paid_at = match &request.paid_at {
            Some(raw) => Some(parse_lesson_date(raw)?),
            None => None,
        };

        let explicit_dates = match &request.class_dates {
            Some(list) => Some(parse_explicit_dates(list)?),
            None => None,
        };

        let period_changed = billing_period_changed(
            payment.billing_start,
            payment.billing_end,
            next_start,
            next_end,
        );

        // 先算好对账计划再落库
        let plan = if let Some(dates) = &explicit_dates {
            let existing = self.load_class_snapshot(payment.id).await?;
            plan_explicit_dates(&existing, dates)
        } else if period_changed {
            let (Some(start), Some(end)) = (next_start, next_end) else {
                return Err(AppError::ValidationError(
                    "Both billing_start and billing_end are required when changing the billing period"
                        .to_string(),
                ));
            };
            let existing = self.load_class_snapshot(payment.id).await?;
            plan_period_change(&existing, start, end)
        } else {
            ReconcilePlan::default()
        };

        let mut model = payment.into_active_model();
        if let Some(amount) = request.amount_cents {
            model.amount_cents = Set(amount);
        }
        if request.billing_start.is_some() {
            model.billing_start = Set(next_start);
        }
        if request.billing_end.is_some() {
            model.billing_end = Set(next_end);
        }
        if let Some(url) = &request.invoice_url {
            model.invoice_url = Set(Some(url.clone()));
        }
        if let Some(paid_at) = paid_at {
            model.paid_at = Set(paid_at);
        }
        model.updated_at = Set(Some(Utc::now()));
        let payment = model.update(&self.pool).await?;

        // 先删后插
        if !plan.delete_ids.is_empty() {
            classes::Entity::delete_many()
                .filter(classes::Column::Id.is_in(plan.delete_ids.clone()))
                .exec(&self.pool)
                .await?;
        }
        if !plan.insert_dates.is_empty() {
            let new_classes: Vec<classes::ActiveModel> = plan
                .insert_dates
                .iter()
                .map(|date| classes::ActiveModel {
                    user_id: Set(payment.user_id),
                    payment_id: Set(payment.id),
                    date: Set(*date),
                    status: Set(ClassStatus::NotStarted),
                    notes: Set(String::new()),
                    is_active: Set(true),
                    ..Default::default()
                })
                .collect();
            classes::Entity::insert_many(new_classes)
                .exec(&self.pool)
                .await?;
        }

        if !plan.is_noop() {
            log::info!(
                "Reconciled classes for payment {}: {} deleted, {} inserted",
                payment.id,
                plan.delete_ids.len(),
                plan.insert_dates.len()
            );
        }

        let class_models = self.load_payment_classes(payment.id).await?;
        Ok(PaymentWithClassesResponse {
            payment: PaymentResponse::from(payment),
            classes: class_models.into_iter().map(ClassResponse::from).collect(),
        })
    }

    /// 管理员分页查询缴费，支持按学生过滤
    pub async fn list_payments(
        &self,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query = payments::Entity::find();
        if let Some(user_id) = query.user_id {
            base_query = base_query.filter(payments::Column::UserId.eq(user_id));
        }
        if !query.include_inactive.unwrap_or(false) {
            base_query = base_query.filter(payments::Column::IsActive.eq(true));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by_desc(payments::Column::PaidAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<PaymentResponse> = models.into_iter().map(PaymentResponse::from).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// 学生查看自己的有效缴费
    pub async fn list_user_payments(&self, user_id: i64) -> AppResult<Vec<PaymentResponse>> {
        let models = payments::Entity::find()
            .filter(payments::Column::UserId.eq(user_id))
            .filter(payments::Column::IsActive.eq(true))
            .order_by_desc(payments::Column::PaidAt)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(PaymentResponse::from).collect())
    }

    /// 查看单笔缴费及其课程；学生只能看自己的有效缴费，管理员不受限
    pub async fn get_payment(
        &self,
        payment_id: i64,
        viewer_id: i64,
        viewer_is_admin: bool,
    ) -> AppResult<PaymentWithClassesResponse> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if !viewer_is_admin && (payment.user_id != viewer_id || !payment.is_active) {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        let class_models = self.load_payment_classes(payment.id).await?;
        Ok(PaymentWithClassesResponse {
            payment: PaymentResponse::from(payment),
            classes: class_models.into_iter().map(ClassResponse::from).collect(),
        })
    }

    /// 软删除缴费并级联停用其课程
    pub async fn delete_payment(&self, payment_id: i64) -> AppResult<()> {
        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        let mut model = payment.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;

        classes::Entity::update_many()
            .col_expr(classes::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .filter(classes::Column::PaymentId.eq(payment_id))
            .filter(classes::Column::IsActive.eq(true))
            .exec(&self.pool)
            .await?;

        log::info!("Deactivated payment {} and its classes", payment_id);
        Ok(())
    }

    /// 恢复缴费；课程保持停用，需要时由管理员另行处理
    pub async fn restore_payment(&self, payment_id: i64) -> AppResult<PaymentResponse> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.is_active {
            return Ok(PaymentResponse::from(payment));
        }

        let mut model = payment.into_active_model();
        model.is_active = Set(true);
        model.updated_at = Set(Some(Utc::now()));
        let restored = model.update(&self.pool).await?;

        log::info!("Restored payment {}", payment_id);
        Ok(PaymentResponse::from(restored))
    }

    /// 对账用的有效课程快照
    async fn load_class_snapshot(&self, payment_id: i64) -> AppResult<Vec<ExistingClass>> {
        let models = classes::Entity::find()
            .filter(classes::Column::PaymentId.eq(payment_id))
            .filter(classes::Column::IsActive.eq(true))
            .all(&self.pool)
            .await?;
        Ok(models
            .into_iter()
            .map(|c| ExistingClass {
                id: c.id,
                date: c.date,
                status: c.status,
            })
            .collect())
    }

    async fn load_payment_classes(&self, payment_id: i64) -> AppResult<Vec<classes::Model>> {
        Ok(classes::Entity::find()
            .filter(classes::Column::PaymentId.eq(payment_id))
            .filter(classes::Column::IsActive.eq(true))
            .order_by_asc(classes::Column::Date)
            .all(&self.pool)
            .await?)
    }
}

/// 更新接口携带的显式课程日期
///
/// 空列表会把 not_started 课程删光又不补任何课，缴费会变成没有课程的
/// 空壳，所以当作参数错误拒绝。
fn parse_explicit_dates(list: &[String]) -> AppResult<Vec<DateTime<Utc>>> {
    if list.is_empty() {
        return Err(AppError::ValidationError(
            "class_dates must contain at least one date".to_string(),
        ));
    }
    list.iter().map(|raw| parse_lesson_date(raw)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::midday_utc;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_explicit_dates_rejects_empty_list() {
        let err = parse_explicit_dates(&[]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_parse_explicit_dates_normalizes_each_entry() {
        let dates =
            parse_explicit_dates(&["2025-08-01".to_string(), "2025-08-15".to_string()]).unwrap();
        assert_eq!(
            dates,
            vec![
                midday_utc(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
                midday_utc(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()),
            ]
        );
    }

    #[test]
    fn test_parse_explicit_dates_rejects_garbage() {
        assert!(parse_explicit_dates(&["not a date".to_string()]).is_err());
    }
}
