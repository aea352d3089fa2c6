//! Core business logic - framework-agnostic operations over the expense hierarchy.
//!
//! Every function takes its database connection as an argument; nothing here holds
//! global state or knows about HTTP.

/// Expense category operations
pub mod category;
/// Expense ledger operations
pub mod expense;
/// Expense head operations
pub mod expense_head;
/// Ownership resolution for hierarchy resources
pub mod ownership;
/// Per-head totals and filtered expense reports
pub mod report;
/// Administrative seeding of a default hierarchy
pub mod seed;
/// Expense subcategory operations
pub mod sub_category;
/// Account registration and credential checks
pub mod user;

use crate::errors::{Error, Result};

/// Trims `value` and rejects it if nothing is left.
pub(crate) fn require_name(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
