//! Console layer - the interactive menu on top of the core repositories.
//!
//! The menu is driven through two explicit values: [`AppContext`] holds what every screen
//! needs (database connection, display settings) and [`Session`] holds who is logged in.
//! Both are passed into every handler; nothing is kept in process-wide state.

/// Prompting, reading and input validation
pub mod console;

/// Category menu
pub mod categories;
/// Seeding, inspection and cleanup commands
pub mod maintenance;
/// Financial summary screen
pub mod summary;
/// Transaction menu
pub mod transactions;
/// User menu
pub mod users;

use crate::{
    config::settings::Settings,
    core::{report, user as user_core},
    entities::user,
    errors::{Error, Result},
};
use console::Console;
use sea_orm::DatabaseConnection;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Shared data available to all menu handlers.
pub struct AppContext {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Symbol printed in front of money amounts
    pub currency_symbol: String,
}

impl AppContext {
    /// Creates a new `AppContext` from a connection and the loaded settings.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: &Settings) -> Self {
        Self {
            database,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    /// Formats `amount` with the configured currency symbol.
    #[must_use]
    pub fn money(&self, amount: f64) -> String {
        report::format_money(amount, &self.currency_symbol)
    }
}

/// Login state of one interactive run.
#[derive(Debug, Default, Clone)]
pub struct Session {
    /// The logged-in user, if any
    pub current_user: Option<user::Model>,
}

impl Session {
    /// Marks `user` as logged in.
    pub fn login(&mut self, user: user::Model) {
        info!(user_id = user.id, "User logged in");
        self.current_user = Some(user);
    }

    /// Clears the login if `user_id` is the logged-in user.
    pub fn forget_user(&mut self, user_id: i64) {
        if self.current_user.as_ref().is_some_and(|user| user.id == user_id) {
            info!(user_id, "Logged-in user removed, logging out");
            self.current_user = None;
        }
    }
}

/// Returns the logged-in user, or tells the user to log in first.
pub(crate) fn require_login<R: BufRead, W: Write>(
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<Option<user::Model>> {
    if session.current_user.is_none() {
        console.say("❌ Please login first.")?;
    }
    Ok(session.current_user.clone())
}

/// Shows a failed repository call to the user.
///
/// Console I/O failures are returned so the menu stops; every other error is printed and
/// the menu carries on.
pub(crate) fn report_failure<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    action: &str,
    error: Error,
) -> Result<()> {
    if let Error::Io(_) = error {
        return Err(error);
    }
    warn!(%error, "Failed {action}");
    console.say(format!("❌ Error {action}: {error}"))
}

/// Prints a heading framed by `=` rules.
pub(crate) fn heading<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    title: &str,
    width: usize,
) -> Result<()> {
    let rule = "=".repeat(width);
    console.say(format!("\n{rule}"))?;
    console.say(title)?;
    console.say(&rule)
}

async fn show_main_menu<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    match &session.current_user {
        Some(user) => {
            console.say(format!("\n👤 Logged in as: {} ({})", user.name, user.email))?;
            match user_core::balance(&ctx.database, user.id).await {
                Ok(balance) => console.say(format!("💰 Current Balance: {}", ctx.money(balance)))?,
                Err(error) => report_failure(console, "loading balance", error)?,
            }
        }
        None => console.say("\n👤 Not logged in")?,
    }

    heading(console, "🏦 PERSONAL FINANCE TRACKER - MAIN MENU", 50)?;
    console.say("1. 👥 User Management")?;
    console.say("2. 📁 Category Management")?;
    console.say("3. 💰 Transaction Management")?;
    console.say("4. 📊 View Financial Summary")?;
    console.say("0. 🚪 Exit")?;
    console.say("=".repeat(50))
}

/// Runs the main menu until the user exits or input ends.
pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say("🏦 Welcome to Personal Finance Tracker! 🏦")?;
    console.say("Manage your income, expenses, and budgets with ease.")?;

    loop {
        show_main_menu(ctx, session, console).await?;
        let Some(choice) = console.prompt("\n> ")? else {
            break;
        };

        match choice.as_str() {
            "0" => break,
            "1" => users::menu(ctx, session, console).await?,
            "2" => categories::menu(ctx, session, console).await?,
            "3" => transactions::menu(ctx, session, console).await?,
            "4" => summary::view_financial_summary(ctx, session, console).await?,
            _ => console.say("❌ Invalid choice. Please select a number from the menu.")?,
        }
    }

    console.say("Thank you for using Personal Finance Tracker. Goodbye!")
}
