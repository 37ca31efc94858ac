//! Account business logic - Handles account creation, listing with balances, updates and removal.
//!
//! Accounts carry no stored balance. Listings load the transactions that reference the
//! selected accounts once and hand them to `core::balance`, which derives each account's
//! balance, uncategorized count and last-updated date for the requested window.

use crate::{
    core::{
        account_type::get_or_create_account_type,
        balance::{self, BalanceWindow},
        parse,
        transaction::get_transactions_for_accounts,
    },
    entities::{Account, AccountType, account, account_type},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `account_type.value` that asks for a new account type named by `account_type.label`.
pub const NEW_ACCOUNT_TYPE_SENTINEL: i64 = -1;

/// Account type names listed by the `bank` filter.
pub const BANK_ACCOUNT_TYPES: [&str; 3] = ["Checking Account", "Savings Account", "Credit Card"];

/// The account type a new account is filed under.
///
/// On the wire this is a select option, `{"value": 3, "label": "Credit Card"}`. A value
/// of `-1` means "create (or reuse) the type named by the label".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AccountTypeOption")]
pub enum AccountTypeRef {
    /// An existing account type id
    Existing(i64),
    /// Name of an account type to look up or create
    New(String),
}

#[derive(Deserialize)]
struct AccountTypeOption {
    #[serde(deserialize_with = "parse::flexible_i64")]
    value: i64,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<AccountTypeOption> for AccountTypeRef {
    type Error = String;

    fn try_from(option: AccountTypeOption) -> std::result::Result<Self, Self::Error> {
        if option.value != NEW_ACCOUNT_TYPE_SENTINEL {
            return Ok(Self::Existing(option.value));
        }

        option
            .label
            .filter(|label| !label.trim().is_empty())
            .map(Self::New)
            .ok_or_else(|| "a new account type needs a non-empty label".to_string())
    }
}

/// Fields for a new account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    /// Display name, must not be blank
    pub name: String,
    /// Existing or new account type
    pub account_type: AccountTypeRef,
    /// Whether a debit increases the balance
    #[serde(default)]
    pub debit_inc: bool,
}

/// Partial update of an account. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountUpdate {
    /// Replacement name
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement account type id
    #[serde(default, deserialize_with = "parse::optional_flexible_i64")]
    pub account_type_id: Option<i64>,
    /// Replacement sign convention
    #[serde(default)]
    pub debit_inc: Option<bool>,
}

/// Which accounts a listing covers, by account type name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountTypeFilter {
    /// Every account
    #[default]
    All,
    /// Checking, savings and credit card accounts
    Bank,
    /// Accounts whose type name is in the list
    Names(Vec<String>),
}

impl AccountTypeFilter {
    /// Parses the `account_type` query value: `all`, `bank`, or a comma-separated list of names.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("" | "all") => Self::All,
            Some("bank") => Self::Bank,
            Some(list) => Self::Names(
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            ),
        }
    }

    fn type_names(&self) -> Option<Vec<String>> {
        match self {
            Self::All => None,
            Self::Bank => Some(BANK_ACCOUNT_TYPES.iter().map(ToString::to_string).collect()),
            Self::Names(names) => Some(names.clone()),
        }
    }
}

/// One row of the account listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    /// Account id
    pub id: i64,
    /// Account name
    pub name: String,
    /// Id of the account's type
    pub account_type_id: i64,
    /// Whether a debit increases the balance
    pub debit_inc: bool,
    /// Name of the account's type
    pub account_type: String,
    /// Reporting group of the account's type
    pub account_group: String,
    /// Balance over the window
    pub balance: f64,
    /// Uncategorized transactions in the window
    pub uncategorized_transactions: usize,
    /// Date of the most recent transaction
    pub last_updated: NaiveDate,
    /// First day of the window
    pub start_date: NaiveDate,
    /// Last day of the window
    pub end_date: NaiveDate,
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Account name cannot be blank."));
    }
    Ok(name)
}

async fn require_account_type<C>(db: &C, account_type_id: i64) -> Result<account_type::Model>
where
    C: ConnectionTrait,
{
    AccountType::find_by_id(account_type_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Account type",
            id: account_type_id,
        })
}

/// Creates an account, creating its account type first when asked to.
///
/// The account type lookup (or creation) and the account insert run in one database
/// transaction, so a failed insert never leaves a stray account type behind.
pub async fn create_account(db: &DatabaseConnection, new: NewAccount) -> Result<account::Model> {
    let name = validate_name(&new.name)?;

    let txn = db.begin().await?;

    let account_type = match &new.account_type {
        AccountTypeRef::Existing(id) => require_account_type(&txn, *id).await?,
        AccountTypeRef::New(label) => get_or_create_account_type(&txn, label).await?,
    };

    let account = account::ActiveModel {
        name: Set(name.to_string()),
        account_type_id: Set(account_type.id),
        debit_inc: Set(new.debit_inc),
        ..Default::default()
    };
    let created = account.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Created account {} '{}' of type '{}'",
        created.id,
        created.name,
        account_type.name
    );
    Ok(created)
}

/// Retrieves a specific account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists accounts with their balances over `window`, ordered by id.
pub async fn get_accounts_by_type(
    db: &DatabaseConnection,
    filter: &AccountTypeFilter,
    window: BalanceWindow,
) -> Result<Vec<AccountSummary>> {
    let mut query = Account::find().find_also_related(AccountType);
    if let Some(names) = filter.type_names() {
        query = query.filter(account_type::Column::Name.is_in(names));
    }

    let rows = query.order_by_asc(account::Column::Id).all(db).await?;

    let ids: Vec<i64> = rows.iter().map(|(account, _)| account.id).collect();
    let transactions = get_transactions_for_accounts(db, &ids).await?;

    let summaries = rows
        .into_iter()
        .map(|(account, account_type)| {
            let summary = balance::summarize(&account, &transactions, &window);
            let (type_name, group_name) = account_type
                .map(|t| (t.name, t.group_name))
                .unwrap_or_default();

            AccountSummary {
                id: account.id,
                name: account.name,
                account_type_id: account.account_type_id,
                debit_inc: account.debit_inc,
                account_type: type_name,
                account_group: group_name,
                balance: summary.balance,
                uncategorized_transactions: summary.uncategorized_transactions,
                last_updated: summary.last_updated.date(),
                start_date: window.start.date(),
                end_date: window.end.date(),
            }
        })
        .collect();

    Ok(summaries)
}

/// All-time balances for the given accounts. Unknown ids are left out of the map.
pub async fn account_balances(
    db: &DatabaseConnection,
    account_ids: &[i64],
) -> Result<BTreeMap<i64, f64>> {
    let accounts = Account::find()
        .filter(account::Column::Id.is_in(account_ids.iter().copied()))
        .all(db)
        .await?;

    let ids: Vec<i64> = accounts.iter().map(|a| a.id).collect();
    let transactions = get_transactions_for_accounts(db, &ids).await?;
    let window = BalanceWindow::default();

    Ok(accounts
        .iter()
        .map(|account| (account.id, balance::net_balance(account, &transactions, &window)))
        .collect())
}

/// Applies a partial update to an account.
///
/// # Errors
/// Returns an error if:
/// - No account has this id
/// - A provided name is blank
/// - A provided account type id does not exist
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i64,
    update: AccountUpdate,
) -> Result<account::Model> {
    let existing = get_account_by_id(db, account_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Account",
            id: account_id,
        })?;

    let mut active: account::ActiveModel = existing.into();

    if let Some(name) = &update.name {
        active.name = Set(validate_name(name)?.to_string());
    }
    if let Some(account_type_id) = update.account_type_id {
        require_account_type(db, account_type_id).await?;
        active.account_type_id = Set(account_type_id);
    }
    if let Some(debit_inc) = update.debit_inc {
        active.debit_inc = Set(debit_inc);
    }

    let updated = active.update(db).await?;
    tracing::info!("Updated account {} '{}'", updated.id, updated.name);
    Ok(updated)
}

/// Deletes an account. Transactions that referenced it keep their other side and become
/// uncategorized.
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<()> {
    let result = Account::delete_by_id(account_id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Account",
            id: account_id,
        });
    }

    tracing::info!("Deleted account {}", account_id);
    Ok(())
}
