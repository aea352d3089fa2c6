//! Expense head, category and subcategory endpoints

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use tracing::instrument;

use crate::api::auth::AuthUser;
use crate::api::dto::{
    CreateCategoryRequest, CreateHeadRequest, CreateSubCategoryRequest, CreatedResponse,
    NamedItem, require_id,
};
use crate::api::state::AppState;
use crate::core::{
    category::{create_category, get_categories_for_head},
    expense_head::create_expense_head,
    report::{HeadTotal, get_head_totals},
    sub_category::{create_sub_category, get_sub_categories_for_category},
};
use crate::errors::Result;

type JsonPayload<T> = std::result::Result<Json<T>, JsonRejection>;
type IdPath = std::result::Result<Path<i64>, PathRejection>;

/// List the caller's expense heads with their spending totals
#[instrument(skip(state))]
pub async fn list_heads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<HeadTotal>>> {
    let totals = get_head_totals(&state.db, user.user_id).await?;
    Ok(Json(totals))
}

/// Create an expense head
#[instrument(skip(state, payload))]
pub async fn add_head(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: JsonPayload<CreateHeadRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;

    let head = create_expense_head(&state.db, user.user_id, &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Expense head added successfully", head.id)),
    ))
}

/// List the categories of one of the caller's heads
#[instrument(skip(state, head_id))]
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    head_id: IdPath,
) -> Result<Json<Vec<NamedItem>>> {
    let Path(head_id) = head_id?;

    let categories = get_categories_for_head(&state.db, user.user_id, head_id).await?;

    Ok(Json(
        categories
            .into_iter()
            .map(|c| NamedItem {
                id: c.id,
                name: c.name,
            })
            .collect(),
    ))
}

/// Create a category under one of the caller's heads
#[instrument(skip(state, payload))]
pub async fn add_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: JsonPayload<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    let head_id = require_id(req.head_id, "head_id")?;

    let category = create_category(&state.db, user.user_id, head_id, &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Category added successfully", category.id)),
    ))
}

/// List the subcategories of one of the caller's categories
#[instrument(skip(state, category_id))]
pub async fn list_subcategories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    category_id: IdPath,
) -> Result<Json<Vec<NamedItem>>> {
    let Path(category_id) = category_id?;

    let subs = get_sub_categories_for_category(&state.db, user.user_id, category_id).await?;

    Ok(Json(
        subs.into_iter()
            .map(|s| NamedItem {
                id: s.id,
                name: s.name,
            })
            .collect(),
    ))
}

/// Create a subcategory under one of the caller's categories
#[instrument(skip(state, payload))]
pub async fn add_subcategory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: JsonPayload<CreateSubCategoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;
    let category_id = require_id(req.category_id, "category_id")?;

    let sub = create_sub_category(&state.db, user.user_id, category_id, &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Subcategory added successfully", sub.id)),
    ))
}
