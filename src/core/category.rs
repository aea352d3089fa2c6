//! Category business logic.
//!
//! Every operation first checks that the parent expense head belongs to the caller.

use crate::{
    core::{
        ownership::{OwnedResource, ensure_owned},
        require_name,
    },
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

const CATEGORY_EXISTS: &str = "Category already exists for this head";

/// Finds a category under `head_id` by exact name.
pub async fn get_category_by_name<C>(
    db: &C,
    head_id: i64,
    name: &str,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::ExpenseHeadId.eq(head_id))
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the categories under an expense head owned by `user_id`.
///
/// # Errors
/// [`Error::NotFound`] or [`Error::Forbidden`] if the head is missing or not the caller's.
pub async fn get_categories_for_head(
    db: &DatabaseConnection,
    user_id: i64,
    head_id: i64,
) -> Result<Vec<category::Model>> {
    ensure_owned(db, user_id, OwnedResource::ExpenseHead(head_id)).await?;

    Category::find()
        .filter(category::Column::ExpenseHeadId.eq(head_id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a category under an expense head owned by `user_id`.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    head_id: i64,
    name: &str,
) -> Result<category::Model> {
    let name = require_name(name, "Category name")?;

    let txn = db.begin().await?;

    ensure_owned(&txn, user_id, OwnedResource::ExpenseHead(head_id)).await?;

    if get_category_by_name(&txn, head_id, &name).await?.is_some() {
        warn!(head_id, %name, "Duplicate category rejected");
        return Err(Error::Duplicate {
            message: CATEGORY_EXISTS.to_string(),
        });
    }

    let category = category::ActiveModel {
        name: Set(name),
        expense_head_id: Set(head_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::from_insert(e, CATEGORY_EXISTS))?;

    txn.commit().await?;

    info!(user_id, head_id, category_id = category.id, "Created category");
    Ok(category)
}
