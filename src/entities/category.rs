//! Category entity - A named spending bucket with an optional budget limit.
//!
//! A `budget_limit` of zero or less means no budget is enforced for the category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Food", "Transport")
    pub name: String,
    /// Spending threshold in dollars; `<= 0` disables budget tracking
    pub budget_limit: f64,
    /// Owning user
    pub user_id: i64,
}

impl Model {
    /// Whether a positive budget limit is set for this category.
    #[must_use]
    pub fn has_budget(&self) -> bool {
        self.budget_limit > 0.0
    }
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One category has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
