use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "class_status")]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    #[sea_orm(string_value = "taken")]
    Taken,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "to_be_rescheduled")]
    ToBeRescheduled,
    #[sea_orm(string_value = "recovered")]
    Recovered,
}

impl std::fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassStatus::NotStarted => write!(f, "not_started"),
            ClassStatus::Taken => write!(f, "taken"),
            ClassStatus::Absent => write!(f, "absent"),
            ClassStatus::ToBeRescheduled => write!(f, "to_be_rescheduled"),
            ClassStatus::Recovered => write!(f, "recovered"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub payment_id: i64,
    pub date: DateTime<Utc>,
    pub status: ClassStatus,
    pub rescheduled_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
