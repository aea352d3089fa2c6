//! Expense head entity - The top level of the spending hierarchy.
//!
//! Each head belongs to exactly one user and groups categories (e.g. "Home", "Travel").
//! The pair (`name`, `user_id`) is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense head database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_heads")]
pub struct Model {
    /// Unique identifier for the expense head
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique per user
    pub name: String,
    /// Owning user
    pub user_id: i64,
}

/// Defines relationships between `ExpenseHead` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each head belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One head has many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
