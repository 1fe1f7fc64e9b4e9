use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "themes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Directory name under the themes root; natural key for reconciliation.
    #[sea_orm(unique)]
    pub folder: String,
    pub active: bool,
    pub version: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::theme_option::Entity")]
    ThemeOptions,
}

impl Related<super::theme_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ThemeOptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
