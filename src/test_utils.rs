//! Shared test utilities for the finance tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{category, transaction, user},
    entities,
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with the given name and email.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, name.to_string(), email.to_string()).await
}

/// Creates a test category owned by `user_id`.
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    budget_limit: f64,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), user_id, budget_limit).await
}

/// Creates a test transaction with sensible defaults.
///
/// # Defaults
/// * `description`: `"Test transaction"`
/// * `transaction_date`: now
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: f64,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        "Test transaction".to_string(),
        amount,
        user_id,
        category_id,
        None,
    )
    .await
}

/// Creates a test transaction dated at `transaction_date`.
pub async fn create_dated_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: f64,
    description: &str,
    transaction_date: DateTime<Utc>,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        description.to_string(),
        amount,
        user_id,
        category_id,
        Some(transaction_date),
    )
    .await
}

/// Sets up a database with one user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "Test User", "test@example.com").await?;
    Ok((db, user))
}

/// Sets up a database with one user owning a "Food" category budgeted at 500.
/// Returns (db, user, category) for budget-related tests.
pub async fn setup_with_category() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::category::Model,
)> {
    let (db, user) = setup_with_user().await?;
    let category = create_test_category(&db, user.id, "Food", 500.0).await?;
    Ok((db, user, category))
}
