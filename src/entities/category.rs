//! Category entity - The middle level of the spending hierarchy.
//!
//! A category belongs to one expense head and has no owner column of its own;
//! ownership is resolved through the head.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique per expense head
    pub name: String,
    /// Parent expense head
    pub expense_head_id: i64,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one expense head
    #[sea_orm(
        belongs_to = "super::expense_head::Entity",
        from = "Column::ExpenseHeadId",
        to = "super::expense_head::Column::Id"
    )]
    ExpenseHead,
    /// One category has many subcategories
    #[sea_orm(has_many = "super::sub_category::Entity")]
    SubCategories,
}

impl Related<super::expense_head::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseHead.def()
    }
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
