//! Expense business logic - append-only recording of individual expenses.
//!
//! An expense is validated, checked against the ownership chain of its subcategory and
//! stamped with the injected clock. There is no update or delete.

use crate::{
    clock::Clock,
    core::ownership::{OwnedResource, ensure_owned},
    entities::{Expense, expense},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

const REQUIRED_FIELDS: &str = "Title, amount, and subcategory are required";

/// Expense as submitted by a caller; any required field may be missing.
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// Short label, required
    pub title: Option<String>,
    /// Amount spent, required and non-zero
    pub amount: Option<f64>,
    /// Target subcategory, required
    pub subcategory_id: Option<i64>,
    /// Optional notes; stored as an empty string when absent
    pub description: Option<String>,
}

#[derive(Debug)]
struct ValidExpense {
    title: String,
    amount: f64,
    subcategory_id: i64,
    description: String,
}

impl NewExpense {
    fn validate(self) -> Result<ValidExpense> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let amount = self.amount.filter(|a| *a != 0.0);
        let subcategory_id = self.subcategory_id.filter(|id| *id != 0);

        let (Some(title), Some(amount), Some(subcategory_id)) = (title, amount, subcategory_id)
        else {
            return Err(Error::validation(REQUIRED_FIELDS));
        };

        if !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }

        Ok(ValidExpense {
            title,
            amount,
            subcategory_id,
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Records a new expense for `user_id`.
///
/// # Errors
/// * [`Error::Validation`] - title, amount or subcategory missing or empty/zero
/// * [`Error::InvalidAmount`] - amount is NaN or infinite
/// * [`Error::NotFound`] / [`Error::Forbidden`] - the subcategory is not the caller's
pub async fn create_expense(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    user_id: i64,
    new_expense: NewExpense,
) -> Result<expense::Model> {
    let valid = new_expense.validate()?;

    let txn = db.begin().await?;

    ensure_owned(&txn, user_id, OwnedResource::SubCategory(valid.subcategory_id)).await?;

    let expense = expense::ActiveModel {
        title: Set(valid.title),
        amount: Set(valid.amount),
        description: Set(Some(valid.description)),
        timestamp: Set(clock.now()),
        user_id: Set(user_id),
        subcategory_id: Set(valid.subcategory_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        user_id,
        expense_id = expense.id,
        subcategory_id = expense.subcategory_id,
        "Recorded expense"
    );
    Ok(expense)
}

/// Retrieves all expenses owned by `user_id` in the order they were recorded.
pub async fn get_expenses_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn march_expense(subcategory_id: i64) -> NewExpense {
        NewExpense {
            title: Some("March".to_string()),
            amount: Some(40.0),
            subcategory_id: Some(subcategory_id),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_expense_validation() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let clock = test_clock();

        let missing_amount = NewExpense {
            amount: None,
            ..march_expense(1)
        };
        let result = create_expense(&db, &clock, 1, missing_amount).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let zero_amount = NewExpense {
            amount: Some(0.0),
            ..march_expense(1)
        };
        let result = create_expense(&db, &clock, 1, zero_amount).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let blank_title = NewExpense {
            title: Some("  ".to_string()),
            ..march_expense(1)
        };
        let result = create_expense(&db, &clock, 1, blank_title).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_expense(&db, &clock, 1, march_expense(0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let infinite = NewExpense {
            amount: Some(f64::INFINITY),
            ..march_expense(1)
        };
        let result = create_expense(&db, &clock, 1, infinite).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
    }

    #[tokio::test]
    async fn test_create_expense_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let (_, _, sub) = create_test_hierarchy(&db, user.id).await?;
        let clock = test_clock();

        let expense = create_expense(&db, &clock, user.id, march_expense(sub.id)).await?;

        assert_eq!(expense.title, "March");
        assert_eq!(expense.amount, 40.0);
        assert_eq!(expense.description.as_deref(), Some(""));
        assert_eq!(expense.timestamp, clock.now());
        assert_eq!(expense.user_id, user.id);
        assert_eq!(expense.subcategory_id, sub.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_amount_persists_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let (_, _, sub) = create_test_hierarchy(&db, user.id).await?;

        let no_amount = NewExpense {
            amount: None,
            ..march_expense(sub.id)
        };
        let result = create_expense(&db, &test_clock(), user.id, no_amount).await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(get_expenses_for_user(&db, user.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_expense_requires_subcategory_ownership() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let (_, _, sub) = create_test_hierarchy(&db, alice.id).await?;
        let clock = test_clock();

        let result = create_expense(&db, &clock, bob.id, march_expense(sub.id)).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let result = create_expense(&db, &clock, alice.id, march_expense(sub.id + 50)).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        assert!(get_expenses_for_user(&db, bob.id).await?.is_empty());
        assert!(get_expenses_for_user(&db, alice.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_description_is_kept() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let (_, _, sub) = create_test_hierarchy(&db, user.id).await?;

        let with_notes = NewExpense {
            description: Some("paid late".to_string()),
            ..march_expense(sub.id)
        };
        let expense = create_expense(&db, &test_clock(), user.id, with_notes).await?;

        assert_eq!(expense.description.as_deref(), Some("paid late"));
        Ok(())
    }
}
