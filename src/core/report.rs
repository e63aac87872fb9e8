//! Report generation business logic.
//!
//! This module provides the financial summary for a user, the per-category report, and the
//! small formatting helpers shared by the console front end. All functions are
//! framework-agnostic and return structured data that the CLI layer formats.

use crate::{
    core::{
        category::{self as category_core, CategoryBudget},
        transaction as transaction_core,
        user as user_core,
    },
    entities::{Transaction, transaction, user},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, prelude::*};

/// Spending in one category as shown in the summary breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// Budget figures for the category
    pub budget: CategoryBudget,
    /// Share of the budget used, in percent; `None` when no budget is set
    pub percent_used: Option<f64>,
}

/// An over-budget category and by how much it is over.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlert {
    /// Category name
    pub category_name: String,
    /// `total_spent - budget_limit`, always positive
    pub overage: f64,
}

/// Everything shown on the "financial summary" screen for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    /// The user being summarised
    pub user: user::Model,
    /// Sum of positive amounts
    pub total_income: f64,
    /// Sum of absolute negative amounts
    pub total_expenses: f64,
    /// Income minus expenses
    pub balance: f64,
    /// Number of categories the user owns
    pub category_count: usize,
    /// Number of transactions the user owns
    pub transaction_count: u64,
    /// Categories with spending, largest spend first
    pub breakdown: Vec<CategorySpending>,
    /// Over-budget categories in category order
    pub alerts: Vec<BudgetAlert>,
}

/// A category with all its transactions, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    /// Budget figures for the category
    pub budget: CategoryBudget,
    /// Transactions linked to the category
    pub transactions: Vec<transaction::Model>,
}

/// Builds the financial summary for `user_id`.
///
/// # Errors
/// - `NotFound` if the user does not exist
pub async fn financial_summary(db: &DatabaseConnection, user_id: i64) -> Result<FinancialSummary> {
    let user = user_core::find_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let totals = user_core::user_totals(db, user_id).await?;
    let budgets = category_core::find_budgets_by_user(db, user_id).await?;
    let transaction_count = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    let alerts = budgets
        .iter()
        .filter(|budget| budget.is_over_budget)
        .map(|budget| BudgetAlert {
            category_name: budget.category.name.clone(),
            overage: budget.total_spent - budget.category.budget_limit,
        })
        .collect();

    let category_count = budgets.len();
    let mut breakdown: Vec<CategorySpending> = budgets
        .into_iter()
        .filter(|budget| budget.total_spent > 0.0)
        .map(|budget| CategorySpending {
            percent_used: calculate_budget_usage(budget.total_spent, budget.category.budget_limit),
            budget,
        })
        .collect();
    breakdown.sort_by(|a, b| b.budget.total_spent.total_cmp(&a.budget.total_spent));

    Ok(FinancialSummary {
        user,
        total_income: totals.income,
        total_expenses: totals.expenses,
        balance: totals.balance(),
        category_count,
        transaction_count,
        breakdown,
        alerts,
    })
}

/// Builds the report for one category.
///
/// # Errors
/// - `NotFound` if the category does not exist
pub async fn category_report(db: &DatabaseConnection, category_id: i64) -> Result<CategoryReport> {
    let category = category_core::find_category_by_id(db, category_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Category",
            id: category_id,
        })?;

    let budget = category_core::budget_status(db, category).await?;
    let transactions = transaction_core::find_transactions_by_category(db, category_id).await?;

    Ok(CategoryReport {
        budget,
        transactions,
    })
}

/// Percentage of `budget_limit` consumed by `total_spent`.
///
/// Returns `None` when no budget is set (`budget_limit <= 0`). Overspending yields values
/// above 100.
#[must_use]
pub fn calculate_budget_usage(total_spent: f64, budget_limit: f64) -> Option<f64> {
    (budget_limit > 0.0).then(|| total_spent * 100.0 / budget_limit)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `percent_used` - Share of the budget used (0-100, may exceed 100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percent_used: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = percent_used.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    // Result is mathematically in [0, length], truncation/sign loss intentional for display.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {percent_used:.1}%")
}

/// Formats a money value with two decimals, e.g. `"$1850.00"` or `"-$50.00"`.
#[must_use]
pub fn format_money(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// Formats a transaction amount with an explicit sign, e.g. `"+$50.00"` or `"-$25.50"`.
#[must_use]
pub fn format_signed_amount(amount: f64, symbol: &str) -> String {
    if amount >= 0.0 {
        format!("+{symbol}{amount:.2}")
    } else {
        format!("-{symbol}{:.2}", amount.abs())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_calculate_budget_usage() {
        assert_eq!(calculate_budget_usage(150.0, 500.0), Some(30.0));
        assert_eq!(calculate_budget_usage(550.0, 500.0), Some(110.0));
        assert_eq!(calculate_budget_usage(50.0, 0.0), None);
        assert_eq!(calculate_budget_usage(50.0, -5.0), None);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, None), "[░░░░░░░░░░] 0.0%");
    }

    #[test]
    fn test_format_progress_bar_overspent() {
        // Overspending fills the bar but keeps the real percentage
        assert_eq!(format_progress_bar(110.0, Some(10)), "[██████████] 110.0%");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1850.0, "$"), "$1850.00");
        assert_eq!(format_money(-50.0, "$"), "-$50.00");
        assert_eq!(format_money(0.0, "€"), "€0.00");
    }

    #[test]
    fn test_format_signed_amount() {
        assert_eq!(format_signed_amount(50.0, "$"), "+$50.00");
        assert_eq!(format_signed_amount(-123.45, "$"), "-$123.45");
    }

    #[tokio::test]
    async fn test_financial_summary_empty_user() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let summary = financial_summary(&db, user.id).await?;
        assert_eq!(summary.user, user);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.category_count, 0);
        assert_eq!(summary.transaction_count, 0);
        assert!(summary.breakdown.is_empty());
        assert!(summary.alerts.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_financial_summary_breakdown_and_alerts() -> Result<()> {
        let (db, user, food) = setup_with_category().await?;
        let transport = create_test_category(&db, user.id, "Transport", 200.0).await?;
        let gifts = create_test_category(&db, user.id, "Gifts", 0.0).await?;
        create_test_category(&db, user.id, "Unused", 100.0).await?;

        create_test_transaction(&db, user.id, None, 2000.0).await?;
        create_test_transaction(&db, user.id, Some(food.id), -150.0).await?;
        create_test_transaction(&db, user.id, Some(transport.id), -250.0).await?;
        create_test_transaction(&db, user.id, Some(gifts.id), -20.0).await?;

        let summary = financial_summary(&db, user.id).await?;
        assert_eq!(summary.total_income, 2000.0);
        assert_eq!(summary.total_expenses, 420.0);
        assert_eq!(summary.balance, 1580.0);
        assert_eq!(summary.category_count, 4);
        assert_eq!(summary.transaction_count, 4);

        // Sorted by spend, unused category left out
        let names: Vec<&str> = summary
            .breakdown
            .iter()
            .map(|entry| entry.budget.category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Transport", "Food", "Gifts"]);
        assert_eq!(summary.breakdown[0].percent_used, Some(125.0));
        assert_eq!(summary.breakdown[1].percent_used, Some(30.0));
        assert_eq!(summary.breakdown[2].percent_used, None);

        assert_eq!(
            summary.alerts,
            vec![BudgetAlert {
                category_name: "Transport".to_string(),
                overage: 50.0,
            }]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_financial_summary_counts_only_own_transactions() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let other = create_test_user(&db, "Bob", "bob@example.com").await?;
        create_test_transaction(&db, user.id, None, 100.0).await?;
        create_test_transaction(&db, user.id, None, -20.0).await?;
        for _ in 0..3 {
            create_test_transaction(&db, other.id, None, 5.0).await?;
        }

        let summary = financial_summary(&db, user.id).await?;
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(financial_summary(&db, other.id).await?.transaction_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_financial_summary_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;

        let result = financial_summary(&db, 7).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "User", id: 7 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_category_report() -> Result<()> {
        let (db, user, food) = setup_with_category().await?;
        create_test_transaction(&db, user.id, Some(food.id), -150.0).await?;
        create_test_transaction(&db, user.id, Some(food.id), -400.0).await?;
        create_test_transaction(&db, user.id, None, 75.0).await?;

        let report = category_report(&db, food.id).await?;
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.budget.total_spent, 550.0);
        assert_eq!(report.budget.remaining_budget, Some(-50.0));
        assert!(report.budget.is_over_budget);

        assert!(matches!(
            category_report(&db, 999).await.unwrap_err(),
            Error::NotFound { entity: "Category", id: 999 }
        ));

        Ok(())
    }
}
