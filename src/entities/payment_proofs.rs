use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// Append-only receipt metadata.
/// - proof_date: local calendar day the receipt counts for
/// - file_ref: opaque reference to the stored receipt (bot file id, upload path)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payment_proofs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub driver_id: i64,
    pub proof_date: NaiveDate,
    pub file_ref: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DriverId",
        to = "super::users::Column::Id"
    )]
    Driver,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
