//! Ownership resolution for the expense hierarchy.
//!
//! Categories and subcategories carry no owner column; their owner is found by walking
//! up to the expense head. [`ensure_owned`] is the single check every nested read and
//! every mutation goes through.

use crate::{
    entities::{Category, ExpenseHead, SubCategory, category, expense_head, sub_category},
    errors::{Error, Result},
};
use sea_orm::{JoinType, QuerySelect, RelationTrait, prelude::*};
use tracing::{debug, warn};

/// A hierarchy node whose owner can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedResource {
    /// Expense head by id
    ExpenseHead(i64),
    /// Category by id, owned through its head
    Category(i64),
    /// Subcategory by id, owned through its category's head
    SubCategory(i64),
}

impl OwnedResource {
    /// Primary key of the referenced row.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::ExpenseHead(id) | Self::Category(id) | Self::SubCategory(id) => id,
        }
    }

    /// Human-readable resource name used in error messages.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::ExpenseHead(_) => "Expense head",
            Self::Category(_) => "Category",
            Self::SubCategory(_) => "Subcategory",
        }
    }
}

/// Resolves the id of the user at the top of `resource`'s ownership chain.
///
/// Returns `Ok(None)` when the resource does not exist. The chain is resolved in a single
/// joined query.
pub async fn resolve_owner<C>(db: &C, resource: OwnedResource) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    let owner = match resource {
        OwnedResource::ExpenseHead(id) => {
            ExpenseHead::find_by_id(id)
                .select_only()
                .column(expense_head::Column::UserId)
                .into_tuple::<i64>()
                .one(db)
                .await?
        }
        OwnedResource::Category(id) => {
            Category::find_by_id(id)
                .select_only()
                .column(expense_head::Column::UserId)
                .join(JoinType::InnerJoin, category::Relation::ExpenseHead.def())
                .into_tuple::<i64>()
                .one(db)
                .await?
        }
        OwnedResource::SubCategory(id) => {
            SubCategory::find_by_id(id)
                .select_only()
                .column(expense_head::Column::UserId)
                .join(JoinType::InnerJoin, sub_category::Relation::Category.def())
                .join(JoinType::InnerJoin, category::Relation::ExpenseHead.def())
                .into_tuple::<i64>()
                .one(db)
                .await?
        }
    };

    debug!(?resource, ?owner, "Resolved resource owner");
    Ok(owner)
}

/// Succeeds only if `resource` exists and traces back to `user_id`.
///
/// # Errors
/// * [`Error::NotFound`] - the resource id does not exist
/// * [`Error::Forbidden`] - the resource belongs to another user
pub async fn ensure_owned<C>(db: &C, user_id: i64, resource: OwnedResource) -> Result<()>
where
    C: ConnectionTrait,
{
    match resolve_owner(db, resource).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => {
            warn!(user_id, ?resource, "Denied access to resource owned by another user");
            Err(Error::Forbidden {
                resource: resource.kind(),
                id: resource.id(),
            })
        }
        None => Err(Error::NotFound {
            resource: resource.kind(),
            id: resource.id().to_string(),
        }),
    }
}
