//! Database configuration module for the finance tracker.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`
//! and created with `IF NOT EXISTS`, so initialisation is idempotent and safe to run on
//! every start-up. Foreign keys come from the entities' `belongs_to` relations.

use crate::entities::{Category, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Database used when neither a flag, `DATABASE_URL`, nor the settings file names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://finance_tracker.sqlite?mode=rwc";

/// Establishes a connection to the `SQLite` database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates a table for `entity` unless it already exists.
async fn create_table_if_absent<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates the users, categories and transactions tables if they are missing.
///
/// Parents are created before children so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_if_absent(db, &schema, User).await?;
    create_table_if_absent(db, &schema, Category).await?;
    create_table_if_absent(db, &schema, Transaction).await?;

    Ok(())
}

/// Connects to `database_url` and makes sure the schema exists.
#[instrument]
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    let db = create_connection(database_url).await?;

    info!("Database connection opened. Ensuring tables are created...");
    create_tables(&db).await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CategoryModel, TransactionModel, UserModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let users: Vec<UserModel> = User::find().all(&db).await?;
        assert!(users.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_init_database_creates_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ledger.sqlite");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let db = init_database(&url).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        assert!(path.exists());

        Ok(())
    }
}
