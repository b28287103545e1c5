//! Email log entity: one row per dispatch attempt.
//!
//! `recipient_email` deliberately carries no foreign key; logs must survive
//! recipient deletion.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "email_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_email: String,
    pub subject: String,
    pub report_date: Date,
    pub attachment_name: Option<String>,
    /// pending | sent | failed
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
