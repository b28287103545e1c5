//! Activity entity: per-report quantities for one construction activity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "report_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub report_id: Uuid,
    pub activity_name: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub target: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub achieved: Decimal,
    /// Running total to date. Aggregation across dates takes the max of this
    /// column, never the sum.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cumulative: Decimal,
    pub remarks: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_report::Entity",
        from = "Column::ReportId",
        to = "super::daily_report::Column::Id",
        on_delete = "Cascade"
    )]
    Report,
}

impl Related<super::daily_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
