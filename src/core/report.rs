//! Report generation business logic.
//!
//! This module provides the per-head spending totals shown on the overview and the
//! filtered expense listing. All functions are framework-agnostic and return structured
//! data that the API layer serializes as-is.

use crate::{
    core::ownership::{OwnedResource, ensure_owned},
    core::expense_head::get_expense_heads_for_user,
    entities::{Expense, category, expense, sub_category},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{JoinType, QueryOrder, QuerySelect, RelationTrait, prelude::*};
use serde::Serialize;
use tracing::debug;

/// Spending total for one expense head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadTotal {
    /// Expense head id
    pub id: i64,
    /// Expense head name
    pub name: String,
    /// Sum of the caller's expenses under this head; `0.0` when there are none
    pub total_amount: f64,
}

/// Narrowing applied to the expense report. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Only expenses whose subcategory chains to this head
    pub head_id: Option<i64>,
    /// Only expenses booked against exactly this subcategory
    pub subcategory_id: Option<i64>,
    /// Inclusive lower bound on the expense timestamp
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the expense timestamp
    pub end: Option<DateTime<Utc>>,
}

/// One line of the expense report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Expense title
    pub title: String,
    /// Expense amount
    pub amount: f64,
    /// When the expense was recorded
    pub timestamp: DateTime<Utc>,
}

impl From<expense::Model> for ReportEntry {
    fn from(model: expense::Model) -> Self {
        Self {
            title: model.title,
            amount: model.amount,
            timestamp: model.timestamp,
        }
    }
}

/// Which end of a date range a query value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// A date-only value means the first instant of that day
    Start,
    /// A date-only value means the last instant of that day
    End,
}

/// Parses a report date bound.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
/// timestamps (taken as UTC), and plain `YYYY-MM-DD` dates, which expand to the whole
/// day according to `bound`.
pub fn parse_date_bound(value: &str, bound: DateBound) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("Invalid date '{value}'")))?;
    let naive = match bound {
        DateBound::Start => date.and_hms_opt(0, 0, 0),
        DateBound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    }
    .ok_or_else(|| Error::validation(format!("Invalid date '{value}'")))?;

    Ok(naive.and_utc())
}

/// Sums the amounts of `user_id`'s expenses whose subcategory chains to `head_id`.
pub async fn head_total(db: &DatabaseConnection, user_id: i64, head_id: i64) -> Result<f64> {
    let total = Expense::find()
        .select_only()
        .column_as(expense::Column::Amount.sum(), "total")
        .join(JoinType::InnerJoin, expense::Relation::SubCategory.def())
        .join(JoinType::InnerJoin, sub_category::Relation::Category.def())
        .filter(category::Column::ExpenseHeadId.eq(head_id))
        .filter(expense::Column::UserId.eq(user_id))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten();

    // SUM over no rows is NULL
    Ok(total.unwrap_or(0.0))
}

/// Lists every expense head of `user_id` with its spending total.
pub async fn get_head_totals(db: &DatabaseConnection, user_id: i64) -> Result<Vec<HeadTotal>> {
    let heads = get_expense_heads_for_user(db, user_id).await?;

    let mut totals = Vec::with_capacity(heads.len());
    for head in heads {
        let total_amount = head_total(db, user_id, head.id).await?;
        totals.push(HeadTotal {
            id: head.id,
            name: head.name,
            total_amount,
        });
    }

    Ok(totals)
}

/// Lists `user_id`'s expenses narrowed by `filter`, in the order they were recorded.
///
/// # Errors
/// * [`Error::Validation`] - `start` is after `end`
/// * [`Error::NotFound`] / [`Error::Forbidden`] - a filter id is not the caller's
pub async fn generate_report(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &ReportFilter,
) -> Result<Vec<ReportEntry>> {
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            return Err(Error::validation("start_date must not be after end_date"));
        }
    }

    let mut query = Expense::find().filter(expense::Column::UserId.eq(user_id));

    if let Some(head_id) = filter.head_id {
        ensure_owned(db, user_id, OwnedResource::ExpenseHead(head_id)).await?;
        query = query
            .join(JoinType::InnerJoin, expense::Relation::SubCategory.def())
            .join(JoinType::InnerJoin, sub_category::Relation::Category.def())
            .filter(category::Column::ExpenseHeadId.eq(head_id));
    }
    if let Some(subcategory_id) = filter.subcategory_id {
        ensure_owned(db, user_id, OwnedResource::SubCategory(subcategory_id)).await?;
        query = query.filter(expense::Column::SubcategoryId.eq(subcategory_id));
    }
    if let Some(start) = filter.start {
        query = query.filter(expense::Column::Timestamp.gte(start));
    }
    if let Some(end) = filter.end {
        query = query.filter(expense::Column::Timestamp.lte(end));
    }

    let expenses = query.order_by_asc(expense::Column::Id).all(db).await?;
    debug!(user_id, ?filter, matches = expenses.len(), "Generated expense report");

    Ok(expenses.into_iter().map(ReportEntry::from).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::clock::FixedClock;
    use crate::core::{
        category::create_category, expense_head::create_expense_head,
        sub_category::create_sub_category,
    };
    use crate::test_utils::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_bound_formats() {
        assert_eq!(
            parse_date_bound("2025-03-05", DateBound::Start).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap()
        );

        let end = parse_date_bound("2025-03-05", DateBound::End).unwrap();
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert!(end > Utc.with_ymd_and_hms(2025, 3, 5, 23, 59, 59).unwrap());

        assert_eq!(
            parse_date_bound("2025-03-05T10:30:00+02:00", DateBound::Start).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 5, 8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_date_bound("2025-03-05 10:30:00", DateBound::End).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 5, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_bound_rejects_garbage() {
        let result = parse_date_bound("last tuesday", DateBound::Start);
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = parse_date_bound("2025-02-30", DateBound::End);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_head_with_no_expenses_totals_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        create_expense_head(&db, user.id, "Empty").await?;

        let totals = get_head_totals(&db, user.id).await?;

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_amount, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_head_totals_do_not_cross_contaminate() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;

        let home = create_expense_head(&db, user.id, "Home").await?;
        let bills = create_category(&db, user.id, home.id, "Bills").await?;
        let power = create_sub_category(&db, user.id, bills.id, "Power").await?;

        let travel = create_expense_head(&db, user.id, "Travel").await?;
        let transport = create_category(&db, user.id, travel.id, "Transport").await?;
        let train = create_sub_category(&db, user.id, transport.id, "Train").await?;

        create_custom_expense(&db, user.id, power.id, "March", 40.0, at(1)).await?;
        create_custom_expense(&db, user.id, power.id, "April", 35.5, at(2)).await?;
        create_custom_expense(&db, user.id, train.id, "Ticket", 12.25, at(3)).await?;

        let totals = get_head_totals(&db, user.id).await?;

        assert_eq!(
            totals,
            vec![
                HeadTotal {
                    id: home.id,
                    name: "Home".to_string(),
                    total_amount: 75.5,
                },
                HeadTotal {
                    id: travel.id,
                    name: "Travel".to_string(),
                    total_amount: 12.25,
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_head_total_ignores_other_users_expenses() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let (head, _, sub) = create_test_hierarchy(&db, alice.id).await?;

        create_custom_expense(&db, alice.id, sub.id, "Mine", 10.0, at(1)).await?;
        // Inserted directly: the API would refuse this, but the sum must still filter on owner
        create_custom_expense(&db, bob.id, sub.id, "Not mine", 99.0, at(1)).await?;

        assert_eq!(head_total(&db, alice.id, head.id).await?, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let (head, category, power) = create_test_hierarchy(&db, user.id).await?;
        let water = create_sub_category(&db, user.id, category.id, "Water").await?;
        let other_head = create_expense_head(&db, user.id, "Other").await?;
        let other_cat = create_category(&db, user.id, other_head.id, "Misc").await?;
        let misc = create_sub_category(&db, user.id, other_cat.id, "Misc").await?;

        create_custom_expense(&db, user.id, power.id, "Power 1", 40.0, at(1)).await?;
        create_custom_expense(&db, user.id, water.id, "Water", 20.0, at(10)).await?;
        create_custom_expense(&db, user.id, power.id, "Power 2", 45.0, at(20)).await?;
        create_custom_expense(&db, user.id, misc.id, "Misc", 5.0, at(15)).await?;

        let titles = |entries: Vec<ReportEntry>| -> Vec<String> {
            entries.into_iter().map(|e| e.title).collect()
        };

        let all = generate_report(&db, user.id, &ReportFilter::default()).await?;
        assert_eq!(titles(all), ["Power 1", "Water", "Power 2", "Misc"]);

        let by_head = ReportFilter {
            head_id: Some(head.id),
            ..Default::default()
        };
        assert_eq!(
            titles(generate_report(&db, user.id, &by_head).await?),
            ["Power 1", "Water", "Power 2"]
        );

        let by_sub = ReportFilter {
            subcategory_id: Some(power.id),
            ..Default::default()
        };
        assert_eq!(
            titles(generate_report(&db, user.id, &by_sub).await?),
            ["Power 1", "Power 2"]
        );

        let by_dates = ReportFilter {
            start: Some(at(10)),
            end: Some(at(15)),
            ..Default::default()
        };
        assert_eq!(
            titles(generate_report(&db, user.id, &by_dates).await?),
            ["Water", "Misc"]
        );

        let combined = ReportFilter {
            head_id: Some(head.id),
            start: Some(at(5)),
            ..Default::default()
        };
        assert_eq!(
            titles(generate_report(&db, user.id, &combined).await?),
            ["Water", "Power 2"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_report_date_only_end_includes_whole_day() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let (_, _, sub) = create_test_hierarchy(&db, user.id).await?;

        create_custom_expense(&db, user.id, sub.id, "Late", 1.0, at(31)).await?;

        let filter = ReportFilter {
            start: Some(parse_date_bound("2025-03-31", DateBound::Start)?),
            end: Some(parse_date_bound("2025-03-31", DateBound::End)?),
            ..Default::default()
        };
        let entries = generate_report(&db, user.id, &filter).await?;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 1.0);
        assert_eq!(entries[0].timestamp, at(31));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_rejects_inverted_range_and_foreign_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let (head, _, sub) = create_test_hierarchy(&db, alice.id).await?;

        let inverted = ReportFilter {
            start: Some(at(20)),
            end: Some(at(10)),
            ..Default::default()
        };
        let result = generate_report(&db, alice.id, &inverted).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let foreign_head = ReportFilter {
            head_id: Some(head.id),
            ..Default::default()
        };
        let result = generate_report(&db, bob.id, &foreign_head).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let foreign_sub = ReportFilter {
            subcategory_id: Some(sub.id),
            ..Default::default()
        };
        let result = generate_report(&db, bob.id, &foreign_sub).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_only_lists_callers_expenses() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let (_, _, alice_sub) = create_test_hierarchy(&db, alice.id).await?;
        let (_, _, bob_sub) = create_test_hierarchy(&db, bob.id).await?;
        let clock = FixedClock(at(4));

        crate::core::expense::create_expense(
            &db,
            &clock,
            alice.id,
            crate::core::expense::NewExpense {
                title: Some("Alice".to_string()),
                amount: Some(1.0),
                subcategory_id: Some(alice_sub.id),
                description: None,
            },
        )
        .await?;
        create_custom_expense(&db, bob.id, bob_sub.id, "Bob", 2.0, at(4)).await?;

        let entries = generate_report(&db, alice.id, &ReportFilter::default()).await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Alice");
        Ok(())
    }
}
