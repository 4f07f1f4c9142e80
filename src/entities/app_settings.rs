use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// The one global settings row
pub const SETTINGS_ROW_ID: i64 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "app_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub monetization_enabled: bool,
    pub payment_instructions: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
