use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

// 既引用课程(class_id), 又内嵌练习备注(comments)快照
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "study_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub class_id: Option<i64>,
    pub session_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comments: String,
    pub is_shared: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
