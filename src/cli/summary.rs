//! Financial summary screen.

use super::{AppContext, Session, console::Console, report_failure, require_login};
use crate::{core::report, errors::Result};
use std::io::{BufRead, Write};

/// Prints totals, the per-category breakdown and budget alerts for the logged-in user.
pub async fn view_financial_summary<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(user) = require_login(session, console)? else {
        return Ok(());
    };

    let summary = match report::financial_summary(&ctx.database, user.id).await {
        Ok(summary) => summary,
        Err(error) => return report_failure(console, "generating financial summary", error),
    };

    console.say(format!("\n=== Financial Summary for {} ===", summary.user.name))?;
    console.say(format!("💰 Total Income: {}", ctx.money(summary.total_income)))?;
    console.say(format!("💸 Total Expenses: {}", ctx.money(summary.total_expenses)))?;
    console.say(format!("💵 Net Balance: {}", ctx.money(summary.balance)))?;
    console.say(format!("📁 Categories: {}", summary.category_count))?;
    console.say(format!("📊 Transactions: {}", summary.transaction_count))?;

    if summary.category_count > 0 {
        console.say("\n📋 CATEGORY BREAKDOWN:")?;
        console.say("-".repeat(50))?;
        for entry in &summary.breakdown {
            let budget = &entry.budget;
            let budget_info = entry.percent_used.map_or_else(String::new, |percent| {
                let status = if budget.is_over_budget { "⚠️ OVER" } else { "✅" };
                format!(
                    " | Budget: {} ({percent:.1}% used) {status}",
                    ctx.money(budget.category.budget_limit)
                )
            });
            console.say(format!(
                "  {}: {}{budget_info}",
                budget.category.name,
                ctx.money(budget.total_spent)
            ))?;
        }
    }

    if !summary.alerts.is_empty() {
        console.say("\n⚠️  BUDGET ALERTS:")?;
        for alert in &summary.alerts {
            console.say(format!(
                "  {}: Over budget by {}",
                alert.category_name,
                ctx.money(alert.overage)
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::super::test_support::*;
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_summary_requires_login() -> Result<()> {
        let (ctx, session) = context().await?;
        let mut console = scripted(&[]);

        view_financial_summary(&ctx, &session, &mut console).await?;

        assert!(printed(console).contains("❌ Please login first."));
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_breakdown_and_alerts() -> Result<()> {
        let (ctx, mut session) = context().await?;
        let user = create_test_user(&ctx.database, "Alice", "alice@example.com").await?;
        let food = create_test_category(&ctx.database, user.id, "Food", 500.0).await?;
        let transport = create_test_category(&ctx.database, user.id, "Transport", 200.0).await?;
        create_test_transaction(&ctx.database, user.id, None, 2000.0).await?;
        create_test_transaction(&ctx.database, user.id, Some(food.id), -150.0).await?;
        create_test_transaction(&ctx.database, user.id, Some(transport.id), -250.0).await?;
        session.login(user);
        let mut console = scripted(&[]);

        view_financial_summary(&ctx, &session, &mut console).await?;

        let out = printed(console);
        assert!(out.contains("=== Financial Summary for Alice ==="));
        assert!(out.contains("💰 Total Income: $2000.00"));
        assert!(out.contains("💸 Total Expenses: $400.00"));
        assert!(out.contains("💵 Net Balance: $1600.00"));
        assert!(out.contains("📁 Categories: 2"));
        assert!(out.contains("📊 Transactions: 3"));
        assert!(out.contains("  Transport: $250.00 | Budget: $200.00 (125.0% used) ⚠️ OVER"));
        assert!(out.contains("  Food: $150.00 | Budget: $500.00 (30.0% used) ✅"));
        assert!(out.find("  Transport:").unwrap() < out.find("  Food:").unwrap());
        assert!(out.contains("  Transport: Over budget by $50.00"));
        Ok(())
    }
}
