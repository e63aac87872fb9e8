//! Operational helpers behind the `seed-demo`, `inspect` and `clean` subcommands.

use crate::{
    entities::{Category, Transaction, User, category, transaction, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};

/// Name of the demo account created by [`seed_demo_data`].
pub const DEMO_USER_NAME: &str = "Test User";
/// Email of the demo account created by [`seed_demo_data`].
pub const DEMO_USER_EMAIL: &str = "test@example.com";

/// Row counts of the three ledger tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    /// Rows in `users`
    pub users: u64,
    /// Rows in `categories`
    pub categories: u64,
    /// Rows in `transactions`
    pub transactions: u64,
}

/// Everything [`seed_demo_data`] inserted.
#[derive(Debug, Clone)]
pub struct DemoData {
    /// The demo account
    pub user: user::Model,
    /// Food and Transport, in that order
    pub categories: Vec<category::Model>,
    /// One salary and two expenses
    pub transactions: Vec<transaction::Model>,
}

/// Creates a demo account with two budgeted categories, a salary and two expenses.
///
/// Everything is inserted in one database transaction, so a failure leaves no partial
/// demo account behind.
///
/// # Errors
/// - `Conflict` if the demo email is already registered
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<DemoData> {
    let txn = db.begin().await?;

    let existing = User::find()
        .filter(user::Column::Email.eq(DEMO_USER_EMAIL))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: format!("Email already exists: {DEMO_USER_EMAIL}"),
        });
    }

    let now = Utc::now();
    let user = user::ActiveModel {
        name: Set(DEMO_USER_NAME.to_string()),
        email: Set(DEMO_USER_EMAIL.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut categories = Vec::with_capacity(2);
    for (name, budget_limit) in [("Food", 500.0), ("Transport", 200.0)] {
        let category = category::ActiveModel {
            name: Set(name.to_string()),
            budget_limit: Set(budget_limit),
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        categories.push(category);
    }

    let mut transactions = Vec::with_capacity(3);
    for (description, amount, category_id) in [
        ("Salary", 2000.0, None),
        ("Grocery shopping", -150.0, Some(categories[0].id)),
        ("Bus fare", -25.0, Some(categories[1].id)),
    ] {
        let transaction = transaction::ActiveModel {
            description: Set(description.to_string()),
            amount: Set(amount),
            transaction_date: Set(now),
            created_at: Set(now),
            user_id: Set(user.id),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        transactions.push(transaction);
    }

    txn.commit().await?;

    Ok(DemoData {
        user,
        categories,
        transactions,
    })
}

/// Counts the rows of every table.
pub async fn table_counts(db: &DatabaseConnection) -> Result<TableCounts> {
    Ok(TableCounts {
        users: User::find().count(db).await?,
        categories: Category::find().count(db).await?,
        transactions: Transaction::find().count(db).await?,
    })
}

/// Deletes every row, children first, in one database transaction.
///
/// Returns how many rows were removed from each table.
pub async fn clear_all_data(db: &DatabaseConnection) -> Result<TableCounts> {
    let txn = db.begin().await?;

    let transactions = Transaction::delete_many().exec(&txn).await?.rows_affected;
    let categories = Category::delete_many().exec(&txn).await?.rows_affected;
    let users = User::delete_many().exec(&txn).await?.rows_affected;

    txn.commit().await?;

    Ok(TableCounts {
        users,
        categories,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{category as category_core, user as user_core},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_seed_demo_data() -> Result<()> {
        let db = setup_test_db().await?;

        let demo = seed_demo_data(&db).await?;
        assert_eq!(demo.user.email, DEMO_USER_EMAIL);
        assert_eq!(demo.categories.len(), 2);
        assert_eq!(demo.transactions.len(), 3);

        let totals = user_core::user_totals(&db, demo.user.id).await?;
        assert_eq!(totals.income, 2000.0);
        assert_eq!(totals.expenses, 175.0);
        assert_eq!(totals.balance(), 1825.0);

        let food = &demo.categories[0];
        assert_eq!(category_core::total_spent(&db, food.id).await?, 150.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_demo_data_twice_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        seed_demo_data(&db).await?;

        let result = seed_demo_data(&db).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        // The failed second run must not have added anything
        let counts = table_counts(&db).await?;
        assert_eq!(
            counts,
            TableCounts {
                users: 1,
                categories: 2,
                transactions: 3,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_nothing_behind() -> Result<()> {
        let db = setup_test_db().await?;
        // Make the last inserts fail after the user and categories went in
        db.execute_unprepared("DROP TABLE transactions").await?;

        let result = seed_demo_data(&db).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        assert_eq!(User::find().count(&db).await?, 0);
        assert_eq!(Category::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_all_data() -> Result<()> {
        let db = setup_test_db().await?;
        seed_demo_data(&db).await?;
        let other = create_test_user(&db, "Bob", "bob@example.com").await?;
        create_test_transaction(&db, other.id, None, 10.0).await?;

        let removed = clear_all_data(&db).await?;
        assert_eq!(
            removed,
            TableCounts {
                users: 2,
                categories: 2,
                transactions: 4,
            }
        );
        assert_eq!(table_counts(&db).await?, TableCounts::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_empty_database() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(clear_all_data(&db).await?, TableCounts::default());
        Ok(())
    }
}
