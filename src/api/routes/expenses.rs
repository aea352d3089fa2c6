//! Expense recording and reporting endpoints

use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::instrument;

use crate::api::auth::AuthUser;
use crate::api::dto::{CreateExpenseRequest, CreatedResponse, ReportQuery};
use crate::api::state::AppState;
use crate::core::{
    expense::create_expense,
    report::{ReportEntry, ReportFilter, generate_report},
};
use crate::errors::Result;

/// Record an expense against one of the caller's subcategories
#[instrument(skip(state, payload))]
pub async fn add_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;

    let expense = create_expense(&state.db, state.clock.as_ref(), user.user_id, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Expense added successfully", expense.id)),
    ))
}

/// List the caller's expenses, optionally filtered by head, subcategory and date range
#[instrument(skip(state, query))]
pub async fn get_reports(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Vec<ReportEntry>>> {
    let Query(query) = query?;
    let filter = ReportFilter::try_from(query)?;

    let entries = generate_report(&state.db, user.user_id, &filter).await?;
    Ok(Json(entries))
}
