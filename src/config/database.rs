//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The per-parent name uniqueness rules
//! span two columns and are added as separate composite unique indexes.

use crate::entities::{
    Category, Expense, ExpenseHead, SubCategory, User, category, expense_head, sub_category,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement, Table};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, warn};

/// Connection URL used when neither `config.toml` nor `DATABASE_URL` provide one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/expenses.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first, since `SQLite`
/// will create the file but not its directory.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_parent_dir(database_url) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    Database::connect(database_url).await.map_err(Into::into)
}

fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path).parent()
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

fn unique_name_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_expense_heads_name_user")
            .table(ExpenseHead)
            .col(expense_head::Column::Name)
            .col(expense_head::Column::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_categories_name_head")
            .table(Category)
            .col(category::Column::Name)
            .col(category::Column::ExpenseHeadId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_sub_categories_name_category")
            .table(SubCategory)
            .col(sub_category::Column::Name)
            .col(sub_category::Column::CategoryId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

/// Creates all necessary database tables and unique indexes if they do not exist.
///
/// Parents are created before children so that foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, User).await?;
    create_table(db, &schema, ExpenseHead).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, SubCategory).await?;
    create_table(db, &schema, Expense).await?;

    for index in unique_name_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    info!("Database tables ensured");
    Ok(())
}

/// Drops every table, children first, then recreates the schema.
///
/// This is the administrative reset used by the `reset` command; nothing reachable
/// over HTTP calls it.
pub async fn reset_database(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    warn!("Dropping all tables");

    for table in [
        Table::drop().table(Expense).if_exists().to_owned(),
        Table::drop().table(SubCategory).if_exists().to_owned(),
        Table::drop().table(Category).if_exists().to_owned(),
        Table::drop().table(ExpenseHead).if_exists().to_owned(),
        Table::drop().table(User).if_exists().to_owned(),
    ] {
        db.execute(builder.build(&table)).await?;
    }

    create_tables(db).await
}
