//! `loans` table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title_id: Uuid,
    pub borrower_id: Uuid,
    pub issue_date: Date,
    pub due_date: Date,
    pub return_date: Option<Date>,
    /// 'issued' or 'returned'
    pub status: String,
    pub late_fee_cents: Option<i64>,
    pub damage_charge_cents: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::titles::Entity",
        from = "Column::TitleId",
        to = "super::titles::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Titles,
    #[sea_orm(
        belongs_to = "super::borrowers::Entity",
        from = "Column::BorrowerId",
        to = "super::borrowers::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Borrowers,
}

impl Related<super::titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Titles.def()
    }
}

impl Related<super::borrowers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
