//! User entity - Represents an account that owns expense heads and expenses.
//!
//! Only the Argon2 PHC string of the password is stored; the plain password never
//! reaches the database.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user, used as the token subject
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all users
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2id hash in PHC string format
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many expense heads
    #[sea_orm(has_many = "super::expense_head::Entity")]
    ExpenseHeads,
    /// One user owns many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense_head::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseHeads.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
