//! User management menu: registration, login, listing and removal.

use super::{
    AppContext, Session,
    console::{Console, parse_email, parse_id},
    heading, report_failure,
};
use crate::{core::user as user_core, errors::Result};
use std::io::{BufRead, Write};
use tracing::info;

/// Runs the user management menu until the user goes back.
pub async fn menu<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    loop {
        heading(console, "👥 USER MANAGEMENT", 40)?;
        console.say("1. 🆕 Create New User")?;
        console.say("2. 🔐 Login")?;
        console.say("3. 👁️  View All Users")?;
        console.say("4. 🗑️  Delete User")?;
        console.say("0. ⬅️  Back to Main Menu")?;
        console.say("=".repeat(40))?;

        let Some(choice) = console.prompt("\n> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "0" => return Ok(()),
            "1" => create_user(ctx, console).await?,
            "2" => login(ctx, session, console).await?,
            "3" => list_users(ctx, console).await?,
            "4" => delete_user(ctx, session, console).await?,
            _ => console.say("❌ Invalid choice.")?,
        }
    }
}

async fn create_user<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== Create New User ===")?;

    let Some(name) = console.prompt_required("Enter your name: ")? else {
        return Ok(());
    };
    let Some(email) = console.prompt_parsed("Enter your email: ", parse_email)? else {
        return Ok(());
    };

    match user_core::create_user(&ctx.database, name, email).await {
        Ok(user) => {
            info!(user_id = user.id, "User created");
            console.say(format!("✅ User created successfully! Welcome, {}!", user.name))
        }
        Err(error) => report_failure(console, "creating user", error),
    }
}

async fn login<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== User Login ===")?;

    let Some(email) = console.prompt_required("Enter your email: ")? else {
        return Ok(());
    };

    match user_core::find_user_by_email(&ctx.database, &email).await {
        Ok(Some(user)) => {
            console.say(format!("✅ Welcome back, {}!", user.name))?;
            session.login(user);
            Ok(())
        }
        Ok(None) => console
            .say("❌ User not found. Please check your email or create a new account."),
        Err(error) => report_failure(console, "during login", error),
    }
}

async fn list_users<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== All Users ===")?;

    let users = match user_core::get_all_users(&ctx.database).await {
        Ok(users) => users,
        Err(error) => return report_failure(console, "retrieving users", error),
    };
    if users.is_empty() {
        return console.say("No users found.");
    }

    for user in users {
        console.say(format!(
            "ID: {} | Name: {} | Email: {}",
            user.id, user.name, user.email
        ))?;
        console.say(format!(
            "  Balance: {} | Categories: {} | Transactions: {}",
            ctx.money(user.balance),
            user.category_count,
            user.transaction_count
        ))?;
        console.say("-".repeat(50))?;
    }
    Ok(())
}

async fn delete_user<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("\n=== Delete User ===")?;

    let Some(user_id) = console.prompt_parsed("Enter user ID to delete: ", parse_id)? else {
        return Ok(());
    };

    let user = match user_core::find_user_by_id(&ctx.database, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return console.say("❌ User not found."),
        Err(error) => return report_failure(console, "deleting user", error),
    };

    let question = format!(
        "Are you sure you want to delete user '{}'? This will delete all their data.",
        user.name
    );
    if !console.confirm(&question)? {
        return console.say("Deletion cancelled.");
    }

    match user_core::delete_user(&ctx.database, user_id).await {
        Ok(()) => {
            info!(user_id, "User deleted");
            session.forget_user(user_id);
            console.say("✅ User deleted successfully.")
        }
        Err(error) => report_failure(console, "deleting user", error),
    }
}
