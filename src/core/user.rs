//! User business logic - registration, lookup, removal and balance aggregates.
//!
//! Emails are compared case-insensitively: they are trimmed and lower-cased before they are
//! stored and before every lookup. Aggregates (`total_income`, `total_expenses`, `balance`)
//! are always computed from a fresh query at call time and never cached on the model.

use crate::{
    entities::{Category, Transaction, User, category, transaction, user},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*};

/// Income and expense totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserTotals {
    /// Sum of all positive amounts
    pub income: f64,
    /// Sum of the absolute values of all negative amounts
    pub expenses: f64,
}

impl UserTotals {
    /// Folds raw signed amounts into income and expense totals.
    #[must_use]
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        amounts
            .into_iter()
            .fold(Self::default(), |mut totals, amount| {
                if amount > 0.0 {
                    totals.income += amount;
                } else if amount < 0.0 {
                    totals.expenses += amount.abs();
                }
                totals
            })
    }

    /// Income minus expenses.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

/// A row of the user listing, with counts and balance computed at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    /// User identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Stored (normalised) email
    pub email: String,
    /// Number of categories owned by the user
    pub category_count: u64,
    /// Number of transactions owned by the user
    pub transaction_count: u64,
    /// Income minus expenses
    pub balance: f64,
}

/// Canonical form used to store and match emails.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new user.
///
/// The name is trimmed and the email normalised with [`normalize_email`]. The duplicate
/// check and the insert run inside one database transaction; a unique-constraint violation
/// reported by the database is also surfaced as a conflict.
///
/// # Errors
/// - `Validation` if the name or email is empty
/// - `Conflict` if the email is already registered
pub async fn create_user(db: &DatabaseConnection, name: String, email: String) -> Result<user::Model> {
    let name = name.trim().to_string();
    let email = normalize_email(&email);
    if name.is_empty() || email.is_empty() {
        return Err(Error::validation("Name and email are required"));
    }

    let txn = db.begin().await?;

    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(email_conflict(&email));
    }

    let user_model = user::ActiveModel {
        name: Set(name),
        email: Set(email.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = user_model.insert(&txn).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_conflict(&email),
        _ => Error::Database(err),
    })?;

    txn.commit().await?;

    Ok(result)
}

fn email_conflict(email: &str) -> Error {
    Error::Conflict {
        message: format!("Email already exists: {email}"),
    }
}

/// Finds a user by its unique ID.
pub async fn find_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email, ignoring case and surrounding whitespace.
pub async fn find_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every user in registration order together with counts and balance.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<UserSummary>> {
    let users = User::find().order_by_asc(user::Column::Id).all(db).await?;

    let mut summaries = Vec::with_capacity(users.len());
    for user in users {
        let category_count = Category::find()
            .filter(category::Column::UserId.eq(user.id))
            .count(db)
            .await?;
        let transaction_count = Transaction::find()
            .filter(transaction::Column::UserId.eq(user.id))
            .count(db)
            .await?;
        let totals = user_totals(db, user.id).await?;

        summaries.push(UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            category_count,
            transaction_count,
            balance: totals.balance(),
        });
    }

    Ok(summaries)
}

/// Deletes a user together with all of its categories and transactions.
///
/// Children are removed before the parent inside a single database transaction, so
/// either the whole cascade is committed or nothing changes.
///
/// # Errors
/// - `NotFound` if the user does not exist
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;

    Transaction::delete_many()
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Category::delete_many()
        .filter(category::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    User::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Reads all of a user's transaction amounts and totals them.
pub async fn user_totals(db: &DatabaseConnection, user_id: i64) -> Result<UserTotals> {
    let amounts: Vec<f64> = Transaction::find()
        .select_only()
        .column(transaction::Column::Amount)
        .filter(transaction::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(UserTotals::from_amounts(amounts))
}

/// Sum of the user's positive transaction amounts.
pub async fn total_income(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    Ok(user_totals(db, user_id).await?.income)
}

/// Sum of the absolute values of the user's negative transaction amounts.
pub async fn total_expenses(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    Ok(user_totals(db, user_id).await?.expenses)
}

/// Income minus expenses for the user.
pub async fn balance(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    Ok(user_totals(db, user_id).await?.balance())
}
