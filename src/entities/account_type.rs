//! Account type entity - The category label an account is reported under.
//!
//! Each account type has a unique name (e.g. "Checking Account", "Groceries") and
//! belongs to a reporting group such as Assets, Liabilities, Income, Expenses or Equity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_types")]
pub struct Model {
    /// Unique identifier for the account type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique, human-readable name (e.g., "Credit Card", "Rent")
    #[sea_orm(unique)]
    pub name: String,
    /// Reporting group label (e.g., "Assets", "Expenses")
    pub group_name: String,
}

/// Defines relationships between `AccountType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account type has many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
