//! Category management menu.

use super::{
    AppContext, Session,
    console::{Console, parse_budget, parse_id},
    heading, report_failure, require_login,
};
use crate::{
    core::{category as category_core, transaction as transaction_core},
    entities::user,
    errors::Result,
};
use std::io::{BufRead, Write};
use tracing::info;

/// Runs the category management menu until the user goes back.
pub async fn menu<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    loop {
        heading(console, "📁 CATEGORY MANAGEMENT", 40)?;
        console.say("1. 🆕 Create New Category")?;
        console.say("2. 👁️  View My Categories")?;
        console.say("3. 🌐 View All Categories")?;
        console.say("4. 🗑️  Delete Category")?;
        console.say("0. ⬅️  Back to Main Menu")?;
        console.say("=".repeat(40))?;

        let Some(choice) = console.prompt("\n> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "0" => return Ok(()),
            "1" => create_category(ctx, session, console).await?,
            "2" => {
                if let Some(user) = require_login(session, console)? {
                    list_user_categories(ctx, &user, console).await?;
                }
            }
            "3" => list_all_categories(ctx, console).await?,
            "4" => delete_category(ctx, session, console).await?,
            _ => console.say("❌ Invalid choice.")?,
        }
    }
}

async fn create_category<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(user) = require_login(session, console)? else {
        return Ok(());
    };
    console.say("\n=== Create New Category ===")?;

    let Some(name) =
        console.prompt_required("Enter category name (e.g., Food, Transport, Entertainment): ")?
    else {
        return Ok(());
    };
    let budget_answer = console
        .prompt("Enter budget limit for this category (optional, press Enter to skip): ")?
        .unwrap_or_default();
    let (budget_limit, note) = parse_budget(&budget_answer);
    if let Some(note) = note {
        console.say(note)?;
    }

    match category_core::create_category(&ctx.database, name, user.id, budget_limit).await {
        Ok(category) => {
            info!(category_id = category.id, user_id = user.id, "Category created");
            let budget = if category.has_budget() {
                format!(" with budget {}", ctx.money(category.budget_limit))
            } else {
                String::new()
            };
            console.say(format!(
                "✅ Category '{}'{budget} created successfully!",
                category.name
            ))
        }
        Err(error) => report_failure(console, "creating category", error),
    }
}

/// Prints the user's categories with spend and budget status.
///
/// Returns `false` when there was nothing to show.
async fn list_user_categories<R: BufRead, W: Write>(
    ctx: &AppContext,
    user: &user::Model,
    console: &mut Console<R, W>,
) -> Result<bool> {
    console.say(format!("\n=== {}'s Categories ===", user.name))?;

    let budgets = match category_core::find_budgets_by_user(&ctx.database, user.id).await {
        Ok(budgets) => budgets,
        Err(error) => {
            report_failure(console, "retrieving categories", error)?;
            return Ok(false);
        }
    };
    if budgets.is_empty() {
        console.say("No categories found. Create some categories first!")?;
        return Ok(false);
    }

    for budget in budgets {
        let category = &budget.category;
        let budget_info = match budget.remaining_budget {
            Some(remaining) => {
                let status = if budget.is_over_budget {
                    "⚠️ OVER BUDGET"
                } else {
                    "✅"
                };
                format!(
                    " | Budget: {} | Remaining: {} {status}",
                    ctx.money(category.budget_limit),
                    ctx.money(remaining)
                )
            }
            None => String::new(),
        };
        let transaction_count =
            match transaction_core::find_transactions_by_category(&ctx.database, category.id)
                .await
            {
                Ok(transactions) => transactions.len(),
                Err(error) => {
                    report_failure(console, "retrieving categories", error)?;
                    return Ok(false);
                }
            };

        console.say(format!(
            "ID: {} | Name: {} | Spent: {}{budget_info}",
            category.id,
            category.name,
            ctx.money(budget.total_spent)
        ))?;
        console.say(format!("  Transactions: {transaction_count}"))?;
        console.say("-".repeat(70))?;
    }
    Ok(true)
}

async fn list_all_categories<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== All Categories ===")?;

    let categories = match category_core::get_all_categories_with_owner(&ctx.database).await {
        Ok(categories) => categories,
        Err(error) => return report_failure(console, "retrieving categories", error),
    };
    if categories.is_empty() {
        return console.say("No categories found.");
    }

    for (category, owner) in categories {
        let spent = match category_core::total_spent(&ctx.database, category.id).await {
            Ok(spent) => spent,
            Err(error) => return report_failure(console, "retrieving categories", error),
        };
        let owner = owner.map_or_else(|| "Unknown".to_string(), |owner| owner.name);

        console.say(format!(
            "ID: {} | Name: {} | User: {owner}",
            category.id, category.name
        ))?;
        console.say(format!(
            "  Budget: {} | Spent: {}",
            ctx.money(category.budget_limit),
            ctx.money(spent)
        ))?;
        console.say("-".repeat(50))?;
    }
    Ok(())
}

async fn delete_category<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(user) = require_login(session, console)? else {
        return Ok(());
    };
    console.say("\n=== Delete Category ===")?;
    if !list_user_categories(ctx, &user, console).await? {
        return Ok(());
    }

    let Some(category_id) = console.prompt_parsed("Enter category ID to delete: ", parse_id)?
    else {
        return Ok(());
    };

    let category = match category_core::find_category_by_id(&ctx.database, category_id).await {
        Ok(Some(category)) => category,
        Ok(None) => return console.say("❌ Category not found."),
        Err(error) => return report_failure(console, "deleting category", error),
    };
    if category.user_id != user.id {
        return console.say("❌ You can only delete your own categories.");
    }

    let question = format!(
        "Are you sure you want to delete category '{}'? This will delete all its transactions.",
        category.name
    );
    if !console.confirm(&question)? {
        return console.say("Deletion cancelled.");
    }

    match category_core::delete_category(&ctx.database, category_id).await {
        Ok(()) => {
            info!(category_id, "Category deleted");
            console.say("✅ Category deleted successfully.")
        }
        Err(error) => report_failure(console, "deleting category", error),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::super::test_support::*;
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_category_menu_requires_login() -> Result<()> {
        let (ctx, session) = context().await?;
        let mut console = scripted(&["1", "2", "4", "0"]);

        menu(&ctx, &session, &mut console).await?;

        assert_eq!(printed(console).matches("❌ Please login first.").count(), 3);
        assert!(category_core::get_all_categories(&ctx.database).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_without_budget() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let user = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        session.login(user.clone());
        let mut console = scripted(&["1", "Gifts", "", "0"]);

        menu(&ctx, &session, &mut console).await?;

        assert!(printed(console).contains("✅ Category 'Gifts' created successfully!"));
        let categories = category_core::find_categories_by_user(&ctx.database, user.id).await?;
        assert_eq!(categories.len(), 1);
        assert!(!categories[0].has_budget());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_negative_budget_becomes_zero() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let user = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        session.login(user.clone());
        let mut console = scripted(&["1", "Fun", "-20", "0"]);

        menu(&ctx, &session, &mut console).await?;

        let out = printed(console);
        assert!(out.contains("Budget limit cannot be negative. Setting to 0."));
        assert!(out.contains("✅ Category 'Fun' created successfully!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_my_categories_flags_over_budget() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let user = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        let food = create_test_category(&ctx.database, user.id, "Food", 500.0).await?;
        create_test_transaction(&ctx.database, user.id, Some(food.id), -150.0).await?;
        create_test_transaction(&ctx.database, user.id, Some(food.id), -400.0).await?;
        session.login(user);
        let mut console = scripted(&["2", "0"]);

        menu(&ctx, &session, &mut console).await?;

        let out = printed(console);
        assert!(out.contains(&format!(
            "ID: {} | Name: Food | Spent: $550.00 | Budget: $500.00 | Remaining: -$50.00 ⚠️ OVER BUDGET",
            food.id
        )));
        assert!(out.contains("  Transactions: 2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_categories_shows_owner() -> Result<()> {
        let (ctx, session) = context().await?;
        let alice = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        let bob = create_test_user(&ctx.database, "Bob", "bob@example.com").await?;
        create_test_category(&ctx.database, alice.id, "Food", 500.0).await?;
        create_test_category(&ctx.database, bob.id, "Travel", 0.0).await?;
        let mut console = scripted(&["3", "0"]);

        menu(&ctx, &session, &mut console).await?;

        let out = printed(console);
        assert!(out.contains("| Name: Food | User: Alice"));
        assert!(out.contains("| Name: Travel | User: Bob"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_cascades_to_transactions() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let user = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        let food = create_test_category(&ctx.database, user.id, "Food", 500.0).await?;
        create_test_transaction(&ctx.database, user.id, Some(food.id), -150.0).await?;
        let salary = create_test_transaction(&ctx.database, user.id, None, 2000.0).await?;
        session.login(user.clone());
        let id = food.id.to_string();
        let mut console = scripted(&["4", &id, "yes", "0"]);

        menu(&ctx, &session, &mut console).await?;

        assert!(printed(console).contains("✅ Category deleted successfully."));
        let remaining = transaction_core::find_transactions_by_user(&ctx.database, user.id).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, salary.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_cannot_delete_someone_elses_category() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let alice = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        let bob = create_test_user(&ctx.database, "Bob", "bob@example.com").await?;
        create_test_category(&ctx.database, alice.id, "Food", 500.0).await?;
        let travel = create_test_category(&ctx.database, bob.id, "Travel", 0.0).await?;
        session.login(alice);
        let id = travel.id.to_string();
        let mut console = scripted(&["4", &id, "0"]);

        menu(&ctx, &session, &mut console).await?;

        assert!(printed(console).contains("❌ You can only delete your own categories."));
        assert!(category_core::find_category_by_id(&ctx.database, travel.id)
            .await?
            .is_some());
        Ok(())
    }
}
