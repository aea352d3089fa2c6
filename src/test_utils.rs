//! Shared test utilities for the expense tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    clock::FixedClock,
    core::{category, expense_head, sub_category},
    entities,
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Placeholder PHC string for users created without going through Argon2.
pub const TEST_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo";

/// Installs a test-writer tracing subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// The pool is capped at one connection so every query sees the same memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Clock frozen at 2025-03-01 12:00:00 UTC.
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
}

/// Inserts a user directly, skipping password hashing.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    let user = entities::user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(TEST_PASSWORD_HASH.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(user)
}

/// Creates the head "Home", category "Bills" and subcategory "Power" for `user_id`.
/// Returns (head, category, subcategory) for common test scenarios.
pub async fn create_test_hierarchy(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<(
    entities::expense_head::Model,
    entities::category::Model,
    entities::sub_category::Model,
)> {
    let head = expense_head::create_expense_head(db, user_id, "Home").await?;
    let category = category::create_category(db, user_id, head.id, "Bills").await?;
    let sub = sub_category::create_sub_category(db, user_id, category.id, "Power").await?;
    Ok((head, category, sub))
}

/// Inserts an expense directly with an explicit timestamp and no ownership check.
/// Use this when a test needs expenses spread over time or rows the API would refuse.
pub async fn create_custom_expense(
    db: &DatabaseConnection,
    user_id: i64,
    subcategory_id: i64,
    title: &str,
    amount: f64,
    timestamp: DateTime<Utc>,
) -> Result<entities::expense::Model> {
    let expense = entities::expense::ActiveModel {
        title: Set(title.to_string()),
        amount: Set(amount),
        description: Set(None),
        timestamp: Set(timestamp),
        user_id: Set(user_id),
        subcategory_id: Set(subcategory_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(expense)
}
