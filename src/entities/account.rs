//! Account entity - A bank account, card, or spending/income category.
//!
//! Accounts never store a balance. The balance is derived from the transactions
//! that reference the account on their debit or credit side (see `core::balance`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name shown across the app (e.g., "AMEX", "Chase Savings")
    pub name: String,
    /// ID of the account type this account belongs to
    pub account_type_id: i64,
    /// Whether a debit increases (true) or decreases (false) the balance
    pub debit_inc: bool,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one account type
    #[sea_orm(
        belongs_to = "super::account_type::Entity",
        from = "Column::AccountTypeId",
        to = "super::account_type::Column::Id",
        on_delete = "Restrict"
    )]
    AccountType,
}

impl Related<super::account_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
