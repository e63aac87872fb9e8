//! Category business logic - Handles category creation, lookup, deletion and budget status.
//!
//! A category belongs to exactly one user. Its spending is the sum of the absolute values of
//! the negative transactions linked to it; a budget limit of zero or less means the category
//! is never over budget and has no remaining-budget figure.

use crate::{
    entities::{Category, Transaction, User, category, transaction, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};

/// A category together with its spending figures, computed at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudget {
    /// The category itself
    pub category: category::Model,
    /// Sum of the absolute values of linked expenses
    pub total_spent: f64,
    /// `budget_limit - total_spent`, or `None` when no budget is set
    pub remaining_budget: Option<f64>,
    /// Whether spending exceeds a positive budget limit
    pub is_over_budget: bool,
}

impl CategoryBudget {
    /// Builds the budget figures for `category` from an already-known spend.
    #[must_use]
    pub fn new(category: category::Model, total_spent: f64) -> Self {
        let remaining_budget = remaining_budget(category.budget_limit, total_spent);
        let is_over_budget = is_over_budget(category.budget_limit, total_spent);
        Self {
            category,
            total_spent,
            remaining_budget,
            is_over_budget,
        }
    }
}

/// Remaining budget, which may be negative once overspent. `None` when `budget_limit <= 0`.
#[must_use]
pub fn remaining_budget(budget_limit: f64, total_spent: f64) -> Option<f64> {
    (budget_limit > 0.0).then(|| budget_limit - total_spent)
}

/// True only when a positive budget limit is set and spending exceeds it.
#[must_use]
pub fn is_over_budget(budget_limit: f64, total_spent: f64) -> bool {
    budget_limit > 0.0 && total_spent > budget_limit
}

/// Creates a new category for an existing user.
///
/// A `budget_limit` of zero or less is accepted and means "no budget".
///
/// # Errors
/// - `Validation` if the name is empty or the budget limit is not a finite number
/// - `NotFound` if `user_id` does not reference an existing user
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    user_id: i64,
    budget_limit: f64,
) -> Result<category::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Category name is required"));
    }

    if !budget_limit.is_finite() {
        return Err(Error::validation("Budget limit must be a number"));
    }

    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let category_model = category::ActiveModel {
        name: Set(name),
        budget_limit: Set(budget_limit),
        user_id: Set(user_id),
        ..Default::default()
    };

    let result = category_model.insert(&txn).await?;
    txn.commit().await?;

    Ok(result)
}

/// Finds a category by its unique ID.
pub async fn find_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's categories in creation order.
pub async fn find_categories_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every category in creation order.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every category with its owner.
pub async fn get_all_categories_with_owner(
    db: &DatabaseConnection,
) -> Result<Vec<(category::Model, Option<user::Model>)>> {
    Category::find()
        .find_also_related(User)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category and every transaction linked to it, atomically.
///
/// Other categories and transactions of the same user are not touched.
///
/// # Errors
/// - `NotFound` if the category does not exist
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Category",
            id: category_id,
        })?;

    Transaction::delete_many()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;
    Category::delete_by_id(category_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Total spent in a category: the absolute sum of its negative transactions.
pub async fn total_spent(db: &DatabaseConnection, category_id: i64) -> Result<f64> {
    let expenses: Vec<f64> = Transaction::find()
        .select_only()
        .column(transaction::Column::Amount)
        .filter(transaction::Column::CategoryId.eq(category_id))
        .filter(transaction::Column::Amount.lt(0.0))
        .into_tuple()
        .all(db)
        .await?;

    Ok(expenses.into_iter().map(f64::abs).sum())
}

/// Computes the current budget status for `category`.
pub async fn budget_status(
    db: &DatabaseConnection,
    category: category::Model,
) -> Result<CategoryBudget> {
    let spent = total_spent(db, category.id).await?;
    Ok(CategoryBudget::new(category, spent))
}

/// Lists a user's categories with their budget status.
pub async fn find_budgets_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<CategoryBudget>> {
    let categories = find_categories_by_user(db, user_id).await?;

    let mut budgets = Vec::with_capacity(categories.len());
    for category in categories {
        budgets.push(budget_status(db, category).await?);
    }
    Ok(budgets)
}
