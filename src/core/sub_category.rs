//! Subcategory business logic.
//!
//! Ownership is resolved through the parent category's expense head, for creation as
//! well as listing.

use crate::{
    core::{
        ownership::{OwnedResource, ensure_owned},
        require_name,
    },
    entities::{SubCategory, sub_category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

const SUB_CATEGORY_EXISTS: &str = "Subcategory already exists";

/// Finds a subcategory under `category_id` by exact name.
pub async fn get_sub_category_by_name<C>(
    db: &C,
    category_id: i64,
    name: &str,
) -> Result<Option<sub_category::Model>>
where
    C: ConnectionTrait,
{
    SubCategory::find()
        .filter(sub_category::Column::CategoryId.eq(category_id))
        .filter(sub_category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the subcategories under a category owned by `user_id`.
pub async fn get_sub_categories_for_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<Vec<sub_category::Model>> {
    ensure_owned(db, user_id, OwnedResource::Category(category_id)).await?;

    SubCategory::find()
        .filter(sub_category::Column::CategoryId.eq(category_id))
        .order_by_asc(sub_category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a subcategory under a category owned by `user_id`.
pub async fn create_sub_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    name: &str,
) -> Result<sub_category::Model> {
    let name = require_name(name, "Subcategory name")?;

    let txn = db.begin().await?;

    ensure_owned(&txn, user_id, OwnedResource::Category(category_id)).await?;

    if get_sub_category_by_name(&txn, category_id, &name).await?.is_some() {
        warn!(category_id, %name, "Duplicate subcategory rejected");
        return Err(Error::Duplicate {
            message: SUB_CATEGORY_EXISTS.to_string(),
        });
    }

    let sub_category = sub_category::ActiveModel {
        name: Set(name),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::from_insert(e, SUB_CATEGORY_EXISTS))?;

    txn.commit().await?;

    info!(
        user_id,
        category_id,
        sub_category_id = sub_category.id,
        "Created subcategory"
    );
    Ok(sub_category)
}
