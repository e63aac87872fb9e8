//! Transaction business logic - Handles all transaction-related operations.
//!
//! This module provides functions for creating, retrieving and deleting transactions.
//! Creation validates the description and amount, checks that the owning user exists and,
//! when a category is given, that the category exists and belongs to that same user. All
//! list queries return the most recent transaction first.

use crate::{
    entities::{Category, Transaction, User, category, transaction, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};

/// Creates a new transaction.
///
/// The sign of `amount` decides its meaning: positive is income, negative is an expense.
/// `transaction_date` defaults to the moment of creation. Reference checks and the insert
/// share one database transaction, so a failed check leaves nothing behind.
///
/// # Arguments
/// * `description` - Description of the transaction
/// * `amount` - Transaction amount (positive for income, negative for expenses)
/// * `user_id` - Owning user
/// * `category_id` - Optional category, which must belong to `user_id`
/// * `transaction_date` - When the money moved, defaults to now
///
/// # Errors
/// - `Validation` if the description is empty or the amount is zero or not finite
/// - `NotFound` if the user or the category does not exist
/// - `Integrity` if the category belongs to a different user
pub async fn create_transaction(
    db: &DatabaseConnection,
    description: String,
    amount: f64,
    user_id: i64,
    category_id: Option<i64>,
    transaction_date: Option<DateTime<Utc>>,
) -> Result<transaction::Model> {
    let description = description.trim().to_string();
    if description.is_empty() {
        return Err(Error::validation("Description is required"));
    }

    if amount == 0.0 {
        return Err(Error::validation("Amount cannot be zero"));
    }

    if !amount.is_finite() {
        return Err(Error::validation("Amount must be a number"));
    }

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;

    if let Some(category_id) = category_id {
        let category = Category::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "Category",
                id: category_id,
            })?;

        if category.user_id != user_id {
            return Err(Error::Integrity {
                message: "Category does not belong to this user".to_string(),
            });
        }
    }

    let now = Utc::now();
    let transaction_model = transaction::ActiveModel {
        description: Set(description),
        amount: Set(amount),
        transaction_date: Set(transaction_date.unwrap_or(now)),
        created_at: Set(now),
        user_id: Set(user_id),
        category_id: Set(category_id),
        ..Default::default()
    };

    let result = transaction_model.insert(&txn).await?;

    txn.commit().await?;

    Ok(result)
}

/// Newest first; ties on the date fall back to insertion order.
fn most_recent_first(select: Select<Transaction>) -> Select<Transaction> {
    select
        .order_by_desc(transaction::Column::TransactionDate)
        .order_by_desc(transaction::Column::Id)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn find_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions of a user, most recent first.
pub async fn find_transactions_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<transaction::Model>> {
    most_recent_first(Transaction::find().filter(transaction::Column::UserId.eq(user_id)))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user's transactions along with their category, most recent first.
pub async fn find_transactions_by_user_with_category(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<(transaction::Model, Option<category::Model>)>> {
    most_recent_first(Transaction::find().filter(transaction::Column::UserId.eq(user_id)))
        .find_also_related(Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions linked to a category, most recent first.
pub async fn find_transactions_by_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<transaction::Model>> {
    most_recent_first(Transaction::find().filter(transaction::Column::CategoryId.eq(category_id)))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every transaction in the ledger, most recent first.
pub async fn get_all_transactions(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    most_recent_first(Transaction::find())
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every transaction with its owner, most recent first.
pub async fn get_all_transactions_with_owner(
    db: &DatabaseConnection,
) -> Result<Vec<(transaction::Model, Option<user::Model>)>> {
    most_recent_first(Transaction::find())
        .find_also_related(User)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a single transaction. Transactions own nothing, so nothing cascades.
///
/// # Errors
/// - `NotFound` if the transaction does not exist
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let outcome = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if outcome.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        });
    }
    Ok(())
}
