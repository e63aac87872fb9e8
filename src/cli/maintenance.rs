//! Output for the `seed-demo`, `inspect` and `clean` subcommands.

use super::{AppContext, console::Console, heading};
use crate::{
    core::{maintenance, user as user_core},
    errors::Result,
};
use std::io::{BufRead, Write};
use tracing::info;

/// Creates the demo account and reports what was inserted.
pub async fn seed_demo<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n👤 CREATING DEMO DATA...")?;

    let demo = maintenance::seed_demo_data(&ctx.database).await?;
    info!(user_id = demo.user.id, "Demo data seeded");

    console.say(format!(
        "✅ Created demo user: {} ({})",
        demo.user.name, demo.user.email
    ))?;
    for category in &demo.categories {
        console.say(format!(
            "  📁 {} (budget {})",
            category.name,
            ctx.money(category.budget_limit)
        ))?;
    }
    for transaction in &demo.transactions {
        console.say(format!(
            "  💰 {}: {}",
            transaction.description,
            ctx.money(transaction.amount)
        ))?;
    }

    let balance = user_core::balance(&ctx.database, demo.user.id).await?;
    console.say(format!("Balance: {}", ctx.money(balance)))
}

/// Prints row counts per table and a line per user.
pub async fn inspect<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    heading(console, "🔍 INSPECTING DATABASE...", 50)?;

    let counts = maintenance::table_counts(&ctx.database).await?;
    console.say(format!("👥 Users: {}", counts.users))?;
    console.say(format!("📁 Categories: {}", counts.categories))?;
    console.say(format!("💰 Transactions: {}", counts.transactions))?;

    let users = user_core::get_all_users(&ctx.database).await?;
    if users.is_empty() {
        return console.say("No users found in database");
    }

    console.say("")?;
    for user in users {
        console.say(format!(
            "#{} {} <{}> | categories: {} | transactions: {} | balance: {}",
            user.id,
            user.name,
            user.email,
            user.category_count,
            user.transaction_count,
            ctx.money(user.balance)
        ))?;
    }
    Ok(())
}

/// Deletes every row after confirmation, or straight away when `assume_yes` is set.
pub async fn clean<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    assume_yes: bool,
) -> Result<()> {
    console.say("\n🧹 CLEANING DATABASE...")?;

    if !assume_yes && !console.confirm("This will delete ALL data. Are you sure?")? {
        return console.say("Cleanup cancelled.");
    }

    let removed = maintenance::clear_all_data(&ctx.database).await?;
    info!(
        users = removed.users,
        categories = removed.categories,
        transactions = removed.transactions,
        "Database cleaned"
    );

    console.say("✅ Cleaned database:")?;
    console.say(format!("  - Deleted {} transactions", removed.transactions))?;
    console.say(format!("  - Deleted {} categories", removed.categories))?;
    console.say(format!("  - Deleted {} users", removed.users))
}
