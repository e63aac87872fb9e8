//! Transaction entity - A single income or expense entry.
//!
//! The sign of `amount` carries the meaning: positive is income, negative is an expense.
//! A transaction always belongs to a user and optionally to one of that user's categories.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable description of the transaction
    pub description: String,
    /// Transaction amount (positive for income, negative for spending)
    pub amount: f64,
    /// When the money moved; defaults to creation time
    pub transaction_date: DateTimeUtc,
    /// When the row was written
    pub created_at: DateTimeUtc,
    /// Owning user
    pub user_id: i64,
    /// Optional category, always owned by the same user
    pub category_id: Option<i64>,
}

impl Model {
    /// True for money received.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// True for money spent.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Absolute amount with a dollar sign, e.g. `"$150.00"`.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        self.formatted_amount_in("$")
    }

    /// Absolute amount with the given currency symbol.
    #[must_use]
    pub fn formatted_amount_in(&self, symbol: &str) -> String {
        format!("{symbol}{:.2}", self.amount.abs())
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// A transaction may belong to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
