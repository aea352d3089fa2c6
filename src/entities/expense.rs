//! Expense entity - A single recorded spend.
//!
//! Each expense has a title, amount, optional description and a creation timestamp.
//! It references its subcategory and, redundantly, its owning `user_id` so that
//! per-user queries need no join.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short label (e.g. "March electricity")
    pub title: String,
    /// Amount spent
    pub amount: f64,
    /// Free-form notes
    pub description: Option<String>,
    /// When the expense was recorded
    pub timestamp: DateTimeUtc,
    /// Owning user
    pub user_id: i64,
    /// Subcategory the expense is booked against
    pub subcategory_id: i64,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each expense belongs to one subcategory
    #[sea_orm(
        belongs_to = "super::sub_category::Entity",
        from = "Column::SubcategoryId",
        to = "super::sub_category::Column::Id"
    )]
    SubCategory,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
