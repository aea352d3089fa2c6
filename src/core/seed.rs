//! Administrative seeding of a default hierarchy.
//!
//! Creates whatever part of a [`SeedConfig`] hierarchy a user does not have yet. Existing
//! heads, categories and subcategories are matched by name and reused, so seeding the
//! same user twice changes nothing the second time. The whole run is one transaction.

use crate::{
    config::seed::SeedConfig,
    core::{
        category::get_category_by_name, expense_head::get_expense_head_by_name, require_name,
        sub_category::get_sub_category_by_name, user::get_user_by_username,
    },
    entities::{category, expense_head, sub_category},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Counts of rows a seeding run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Expense heads created
    pub heads_created: usize,
    /// Categories created
    pub categories_created: usize,
    /// Subcategories created
    pub subcategories_created: usize,
}

/// Seeds `seed` into the hierarchy of the user named `username`.
///
/// # Errors
/// [`Error::NotFound`] if no such user exists, [`Error::Validation`] for a blank name in
/// the seed file.
#[instrument(skip(db, seed))]
pub async fn seed_hierarchy(
    db: &DatabaseConnection,
    username: &str,
    seed: &SeedConfig,
) -> Result<SeedSummary> {
    let txn = db.begin().await?;

    let user = get_user_by_username(&txn, username)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "User",
            id: username.to_string(),
        })?;

    let mut summary = SeedSummary::default();

    for head_seed in &seed.heads {
        let head_name = require_name(&head_seed.name, "Expense head name")?;
        let head = if let Some(existing) = get_expense_head_by_name(&txn, user.id, &head_name).await? {
            debug!(head = %head_name, "Expense head already present");
            existing
        } else {
            summary.heads_created += 1;
            expense_head::ActiveModel {
                name: Set(head_name),
                user_id: Set(user.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        };

        for category_seed in &head_seed.categories {
            let category_name = require_name(&category_seed.name, "Category name")?;
            let category = if let Some(existing) =
                get_category_by_name(&txn, head.id, &category_name).await?
            {
                existing
            } else {
                summary.categories_created += 1;
                category::ActiveModel {
                    name: Set(category_name),
                    expense_head_id: Set(head.id),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            };

            for sub_name in &category_seed.subcategories {
                let sub_name = require_name(sub_name, "Subcategory name")?;
                if get_sub_category_by_name(&txn, category.id, &sub_name)
                    .await?
                    .is_none()
                {
                    summary.subcategories_created += 1;
                    sub_category::ActiveModel {
                        name: Set(sub_name),
                        category_id: Set(category.id),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }
    }

    txn.commit().await?;

    info!(
        user_id = user.id,
        heads = summary.heads_created,
        categories = summary.categories_created,
        subcategories = summary.subcategories_created,
        "Seeded hierarchy"
    );
    Ok(summary)
}
