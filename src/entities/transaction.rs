//! Transaction entity - A movement of money between two accounts.
//!
//! Amounts are always non-negative; direction is encoded by which side holds an
//! account. A transaction with either `debit_account_id` or `credit_account_id`
//! unset is uncategorized and does not count towards any balance yet.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short name (e.g., "March Rent")
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Non-negative amount in dollars, rounded to cents
    pub amount: f64,
    /// Account debited by this transaction, if categorized on that side
    pub debit_account_id: Option<i64>,
    /// Account credited by this transaction, if categorized on that side
    pub credit_account_id: Option<i64>,
    /// When the transaction happened
    pub transaction_date: DateTime,
    /// When the transaction was last entered or edited
    pub date_entered: DateTime,
}

impl Model {
    /// True when either side of the transaction has no account yet.
    #[must_use]
    pub const fn is_uncategorized(&self) -> bool {
        self.debit_account_id.is_none() || self.credit_account_id.is_none()
    }

    /// True when the account appears on either side.
    #[must_use]
    pub fn involves(&self, account_id: i64) -> bool {
        self.debit_account_id == Some(account_id) || self.credit_account_id == Some(account_id)
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The account on the debit side
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::DebitAccountId",
        to = "super::account::Column::Id",
        on_delete = "SetNull"
    )]
    DebitAccount,
    /// The account on the credit side
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::CreditAccountId",
        to = "super::account::Column::Id",
        on_delete = "SetNull"
    )]
    CreditAccount,
}

impl ActiveModelBehavior for ActiveModel {}
