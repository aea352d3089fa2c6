//! Expense head business logic - the top level of a user's hierarchy.
//!
//! Heads are owned directly by a user. Names are unique per user, so two users may both
//! have a "Home" head.

use crate::{
    core::require_name,
    entities::{ExpenseHead, expense_head},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

const HEAD_EXISTS: &str = "Expense head already exists for this user";

/// Finds a user's expense head by exact name.
pub async fn get_expense_head_by_name<C>(
    db: &C,
    user_id: i64,
    name: &str,
) -> Result<Option<expense_head::Model>>
where
    C: ConnectionTrait,
{
    ExpenseHead::find()
        .filter(expense_head::Column::UserId.eq(user_id))
        .filter(expense_head::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all expense heads owned by `user_id`, in creation order.
pub async fn get_expense_heads_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<expense_head::Model>> {
    ExpenseHead::find()
        .filter(expense_head::Column::UserId.eq(user_id))
        .order_by_asc(expense_head::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an expense head for `user_id`.
///
/// # Errors
/// * [`Error::Validation`] - the name is blank
/// * [`Error::Duplicate`] - the user already has a head with this name
pub async fn create_expense_head(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<expense_head::Model> {
    let name = require_name(name, "Expense head name")?;

    let txn = db.begin().await?;

    if get_expense_head_by_name(&txn, user_id, &name).await?.is_some() {
        warn!(user_id, %name, "Duplicate expense head rejected");
        return Err(Error::Duplicate {
            message: HEAD_EXISTS.to_string(),
        });
    }

    let head = expense_head::ActiveModel {
        name: Set(name),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::from_insert(e, HEAD_EXISTS))?;

    txn.commit().await?;

    info!(user_id, head_id = head.id, "Created expense head");
    Ok(head)
}
