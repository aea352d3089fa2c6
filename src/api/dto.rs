//! Data Transfer Objects for API requests and responses
//!
//! Request fields are optional so that a missing field surfaces as a validation error
//! with a readable message instead of a deserialization failure.

use serde::{Deserialize, Serialize};

use crate::core::{
    expense::NewExpense,
    report::{DateBound, ReportFilter, parse_date_bound},
};
use crate::errors::{Error, Result};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving
    pub status: String,
}

// ============ Auth DTOs ============

/// Register and login request
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Login name; surrounding whitespace is ignored
    #[serde(default)]
    pub username: String,
    /// Plain-text password, never stored
    #[serde(default)]
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed JWT to send as `Authorization: Bearer <token>`
    pub access_token: String,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

// ============ Hierarchy DTOs ============

/// Create expense head request
#[derive(Debug, Deserialize)]
pub struct CreateHeadRequest {
    /// Head name, unique per user
    #[serde(default)]
    pub name: String,
}

/// Create category request
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name, unique per head
    #[serde(default)]
    pub name: String,
    /// Parent expense head
    pub head_id: Option<i64>,
}

/// Create subcategory request
#[derive(Debug, Deserialize)]
pub struct CreateSubCategoryRequest {
    /// Subcategory name, unique per category
    #[serde(default)]
    pub name: String,
    /// Parent category
    pub category_id: Option<i64>,
}

/// Category or subcategory listing entry
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedItem {
    /// Row id
    pub id: i64,
    /// Display name
    pub name: String,
}

/// Returned by every create endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Id of the new row
    pub id: i64,
}

impl CreatedResponse {
    /// Confirmation for the row `id`.
    #[must_use]
    pub fn new(message: &str, id: i64) -> Self {
        Self {
            message: message.to_string(),
            id,
        }
    }
}

/// Unwraps a required id, treating `0` the same as absent.
pub fn require_id(value: Option<i64>, field: &str) -> Result<i64> {
    value
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::validation(format!("{field} is required")))
}

// ============ Expense DTOs ============

/// Add expense request
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Short label, required
    pub title: Option<String>,
    /// Non-zero amount, required
    pub amount: Option<f64>,
    /// Target subcategory, required
    pub subcategory_id: Option<i64>,
    /// Optional notes
    pub description: Option<String>,
}

impl From<CreateExpenseRequest> for NewExpense {
    fn from(req: CreateExpenseRequest) -> Self {
        Self {
            title: req.title,
            amount: req.amount,
            subcategory_id: req.subcategory_id,
            description: req.description,
        }
    }
}

/// Report query string. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Only expenses under this head
    pub head_id: Option<String>,
    /// Only expenses booked against this subcategory; `category_id` is the older name
    #[serde(alias = "category_id")]
    pub subcategory_id: Option<String>,
    /// Inclusive lower bound, RFC 3339 or `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive upper bound, RFC 3339 or `YYYY-MM-DD`
    pub end_date: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_id(value: Option<&String>, field: &str) -> Result<Option<i64>> {
    non_empty(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| Error::validation(format!("{field} must be an integer")))
        })
        .transpose()
}

impl TryFrom<ReportQuery> for ReportFilter {
    type Error = Error;

    fn try_from(query: ReportQuery) -> Result<Self> {
        Ok(Self {
            head_id: parse_id(query.head_id.as_ref(), "head_id")?,
            subcategory_id: parse_id(query.subcategory_id.as_ref(), "subcategory_id")?,
            start: non_empty(query.start_date.as_ref())
                .map(|v| parse_date_bound(v, DateBound::Start))
                .transpose()?,
            end: non_empty(query.end_date.as_ref())
                .map(|v| parse_date_bound(v, DateBound::End))
                .transpose()?,
        })
    }
}
