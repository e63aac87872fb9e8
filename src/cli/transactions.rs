//! Transaction management menu.

use super::{
    AppContext, Session,
    console::{Console, parse_id, parse_positive_amount},
    heading, report_failure, require_login,
};
use crate::{
    core::{
        category as category_core, report, transaction as transaction_core,
        user::UserTotals,
    },
    entities::{category, user},
    errors::{Error, Result},
};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::info;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Runs the transaction management menu until the user goes back.
pub async fn menu<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    loop {
        heading(console, "💰 TRANSACTION MANAGEMENT", 40)?;
        console.say("1. ➕ Add New Transaction")?;
        console.say("2. 📋 View My Transactions")?;
        console.say("3. 📁 View Category Transactions")?;
        console.say("4. 🌐 View All Transactions")?;
        console.say("5. 🗑️  Delete Transaction")?;
        console.say("0. ⬅️  Back to Main Menu")?;
        console.say("=".repeat(40))?;

        let Some(choice) = console.prompt("\n> ")? else {
            return Ok(());
        };
        if choice == "0" {
            return Ok(());
        }
        if choice == "4" {
            list_all_transactions(ctx, console).await?;
            continue;
        }
        if !matches!(choice.as_str(), "1" | "2" | "3" | "5") {
            console.say("❌ Invalid choice.")?;
            continue;
        }

        let Some(user) = require_login(session, console)? else {
            continue;
        };
        match choice.as_str() {
            "1" => add_transaction(ctx, &user, console).await?,
            "2" => list_user_transactions(ctx, &user, console).await?,
            "3" => list_category_transactions(ctx, &user, console).await?,
            _ => delete_transaction(ctx, &user, console).await?,
        }
    }
}

/// Lets the user pick one of their categories for an expense.
///
/// `Ok(Some(None))` means "no category"; `Ok(None)` means the selection was invalid.
async fn choose_category<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<Option<Option<category::Model>>> {
    let categories = category_core::find_categories_by_user(&ctx.database, user.id).await?;
    if categories.is_empty() {
        return Ok(Some(None));
    }

    console.say("\nAvailable categories:")?;
    for category in &categories {
        console.say(format!("{}. {}", category.id, category.name))?;
    }
    console.say("0. No category")?;

    let answer = console.prompt("Select category (number): ")?.unwrap_or_default();
    let Ok(category_id) = answer.parse::<i64>() else {
        return Ok(Some(None));
    };
    if category_id <= 0 {
        return Ok(Some(None));
    }

    let selected = categories
        .into_iter()
        .find(|category| category.id == category_id);
    if selected.is_none() {
        console.say("❌ Invalid category selection.")?;
        return Ok(None);
    }
    Ok(Some(selected))
}

async fn add_transaction<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== Add New Transaction ===")?;
    console.say("1. Income (money received)")?;
    console.say("2. Expense (money spent)")?;

    let is_income = match console
        .prompt("Select transaction type (1 or 2): ")?
        .as_deref()
    {
        Some("1") => true,
        Some("2") => false,
        _ => return console.say("❌ Invalid choice."),
    };

    let Some(description) = console.prompt_required("Enter transaction description: ")? else {
        return Ok(());
    };
    let Some(amount) =
        console.prompt_parsed("Enter amount (positive number): ", parse_positive_amount)?
    else {
        return Ok(());
    };
    let signed_amount = if is_income { amount } else { -amount };

    let category = if is_income {
        None
    } else {
        match choose_category(ctx, user, console).await {
            Ok(Some(category)) => category,
            Ok(None) => return Ok(()),
            Err(error) => return report_failure(console, "adding transaction", error),
        }
    };

    let created = transaction_core::create_transaction(
        &ctx.database,
        description,
        signed_amount,
        user.id,
        category.as_ref().map(|category| category.id),
        None,
    )
    .await;
    let transaction = match created {
        Ok(transaction) => transaction,
        Err(error) => return report_failure(console, "adding transaction", error),
    };
    info!(transaction_id = transaction.id, user_id = user.id, "Transaction added");

    let kind = if is_income { "Income" } else { "Expense" };
    let in_category = category
        .as_ref()
        .map(|category| format!(" in category '{}'", category.name))
        .unwrap_or_default();
    console.say(format!(
        "✅ {kind} of {}{in_category} added successfully!",
        ctx.money(amount)
    ))?;

    if let Some(category) = category {
        match category_core::budget_status(&ctx.database, category).await {
            Ok(budget) if budget.is_over_budget => console.say(format!(
                "⚠️  WARNING: You've exceeded your budget for '{}'!",
                budget.category.name
            ))?,
            Ok(_) => {}
            Err(error) => report_failure(console, "checking budget", error)?,
        }
    }
    Ok(())
}

async fn list_user_transactions<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say(format!("\n=== {}'s Transaction History ===", user.name))?;

    let transactions =
        match transaction_core::find_transactions_by_user_with_category(&ctx.database, user.id)
            .await
        {
            Ok(transactions) => transactions,
            Err(error) => return report_failure(console, "retrieving transactions", error),
        };
    if transactions.is_empty() {
        return console.say("No transactions found. Add some transactions first!");
    }

    for (transaction, category) in &transactions {
        let kind = if transaction.is_income() {
            "📈 INCOME"
        } else {
            "📉 EXPENSE"
        };
        let category_name = category
            .as_ref()
            .map_or("No Category", |category| category.name.as_str());

        console.say(format!(
            "ID: {} | {kind} | {}",
            transaction.id,
            transaction.formatted_amount_in(&ctx.currency_symbol)
        ))?;
        console.say(format!("  Description: {}", transaction.description))?;
        console.say(format!(
            "  Category: {category_name} | Date: {}",
            transaction.transaction_date.format(DATE_TIME_FORMAT)
        ))?;
        console.say("-".repeat(70))?;
    }

    let totals = UserTotals::from_amounts(transactions.iter().map(|(t, _)| t.amount));
    console.say("\n💰 SUMMARY:")?;
    console.say(format!("Total Income: {}", ctx.money(totals.income)))?;
    console.say(format!("Total Expenses: {}", ctx.money(totals.expenses)))?;
    console.say(format!("Net Balance: {}", ctx.money(totals.balance())))
}

async fn list_category_transactions<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== Category Transactions ===")?;

    let budgets = match category_core::find_budgets_by_user(&ctx.database, user.id).await {
        Ok(budgets) => budgets,
        Err(error) => return report_failure(console, "retrieving category transactions", error),
    };
    if budgets.is_empty() {
        return console.say("No categories found. Create some categories first!");
    }

    console.say("Your categories:")?;
    for budget in &budgets {
        console.say(format!(
            "{}. {} ({} spent)",
            budget.category.id,
            budget.category.name,
            ctx.money(budget.total_spent)
        ))?;
    }

    let Some(category_id) = console.prompt_parsed("Enter category ID: ", parse_id)? else {
        return Ok(());
    };
    if !budgets
        .iter()
        .any(|budget| budget.category.id == category_id)
    {
        return console.say("❌ Category not found or doesn't belong to you.");
    }

    let category_report = match report::category_report(&ctx.database, category_id).await {
        Ok(category_report) => category_report,
        Err(Error::NotFound { .. }) => {
            return console.say("❌ Category not found or doesn't belong to you.");
        }
        Err(error) => return report_failure(console, "retrieving category transactions", error),
    };
    let budget = &category_report.budget;

    console.say(format!("\n=== Transactions in '{}' ===", budget.category.name))?;
    if category_report.transactions.is_empty() {
        return console.say("No transactions found in this category.");
    }

    for transaction in &category_report.transactions {
        console.say(format!(
            "ID: {} | {}",
            transaction.id,
            report::format_signed_amount(transaction.amount, &ctx.currency_symbol)
        ))?;
        console.say(format!("  Description: {}", transaction.description))?;
        console.say(format!(
            "  Date: {}",
            transaction.transaction_date.format(DATE_TIME_FORMAT)
        ))?;
        console.say("-".repeat(50))?;
    }

    console.say(format!(
        "\nTotal spent in this category: {}",
        ctx.money(budget.total_spent)
    ))?;
    if let Some(remaining) = budget.remaining_budget {
        console.say(format!(
            "Budget limit: {}",
            ctx.money(budget.category.budget_limit)
        ))?;
        console.say(format!("Remaining budget: {}", ctx.money(remaining)))?;
        if let Some(percent) =
            report::calculate_budget_usage(budget.total_spent, budget.category.budget_limit)
        {
            console.say(format!("Usage: {}", report::format_progress_bar(percent, None)))?;
        }
        if budget.is_over_budget {
            console.say("⚠️  OVER BUDGET!")?;
        }
    }
    Ok(())
}

async fn list_all_transactions<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== All Transactions ===")?;

    let listing = async {
        let transactions = transaction_core::get_all_transactions_with_owner(&ctx.database).await?;
        let category_names: HashMap<i64, String> =
            category_core::get_all_categories(&ctx.database)
                .await?
                .into_iter()
                .map(|category| (category.id, category.name))
                .collect();
        Ok::<_, Error>((transactions, category_names))
    };
    let (transactions, category_names) = match listing.await {
        Ok(listing) => listing,
        Err(error) => return report_failure(console, "retrieving transactions", error),
    };
    if transactions.is_empty() {
        return console.say("No transactions found.");
    }

    for (transaction, owner) in transactions {
        let kind = if transaction.is_income() {
            "INCOME"
        } else {
            "EXPENSE"
        };
        let owner = owner.map_or_else(|| "Unknown".to_string(), |owner| owner.name);
        let category_name = transaction
            .category_id
            .and_then(|id| category_names.get(&id))
            .map_or("No Category", String::as_str);

        console.say(format!(
            "ID: {} | {kind} | {}",
            transaction.id,
            transaction.formatted_amount_in(&ctx.currency_symbol)
        ))?;
        console.say(format!("  User: {owner} | Category: {category_name}"))?;
        console.say(format!(
            "  Description: {} | Date: {}",
            transaction.description,
            transaction.transaction_date.format("%Y-%m-%d")
        ))?;
        console.say("-".repeat(60))?;
    }
    Ok(())
}

async fn delete_transaction<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== Delete Transaction ===")?;

    let Some(transaction_id) =
        console.prompt_parsed("Enter transaction ID to delete: ", parse_id)?
    else {
        return Ok(());
    };

    let transaction =
        match transaction_core::find_transaction_by_id(&ctx.database, transaction_id).await {
            Ok(Some(transaction)) => transaction,
            Ok(None) => return console.say("❌ Transaction not found."),
            Err(error) => return report_failure(console, "deleting transaction", error),
        };
    if transaction.user_id != user.id {
        return console.say("❌ You can only delete your own transactions.");
    }

    let category_name = match transaction.category_id {
        Some(category_id) => {
            match category_core::find_category_by_id(&ctx.database, category_id).await {
                Ok(category) => category.map(|category| category.name),
                Err(error) => return report_failure(console, "deleting transaction", error),
            }
        }
        None => None,
    };
    let kind = if transaction.is_income() {
        "Income"
    } else {
        "Expense"
    };

    console.say("\nTransaction to delete:")?;
    console.say(format!(
        "  {kind}: {}",
        transaction.formatted_amount_in(&ctx.currency_symbol)
    ))?;
    console.say(format!("  Description: {}", transaction.description))?;
    console.say(format!(
        "  Category: {}",
        category_name.as_deref().unwrap_or("No Category")
    ))?;

    if !console.confirm("Are you sure you want to delete this transaction?")? {
        return console.say("Deletion cancelled.");
    }

    match transaction_core::delete_transaction(&ctx.database, transaction_id).await {
        Ok(()) => {
            info!(transaction_id, "Transaction deleted");
            console.say("✅ Transaction deleted successfully.")
        }
        Err(error) => report_failure(console, "deleting transaction", error),
    }
}
