//! Transaction business logic - Handles all transaction-related operations.
//!
//! This module provides functions for creating, retrieving, categorizing, updating and
//! removing transactions, individually and in batches. Transactions never touch a stored
//! balance: account balances are derived from them on demand by `core::balance`.
//! A transaction may be entered with one side unset (uncategorized) and have the missing
//! side filled in later, either through `categorize_transaction` or a full update.

use crate::{
    core::{
        balance::{now, round_cents},
        batch::{BatchOutcome, index_key},
        parse,
    },
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use serde_json::Value;

/// Fields for a new transaction.
///
/// Amounts and account ids may arrive as numbers or numeric strings; the date may be a
/// bare `YYYY-MM-DD` or a full timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// Short name, must not be empty
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Finite, non-negative amount; rounded to cents on insert
    #[serde(deserialize_with = "parse::flexible_f64")]
    pub amount: f64,
    /// Account on the debit side, if already known
    #[serde(default, deserialize_with = "parse::optional_flexible_i64")]
    pub debit_account_id: Option<i64>,
    /// Account on the credit side, if already known
    #[serde(default, deserialize_with = "parse::optional_flexible_i64")]
    pub credit_account_id: Option<i64>,
    /// When the transaction happened
    #[serde(deserialize_with = "parse::date_time")]
    pub transaction_date: NaiveDateTime,
}

/// Partial update of a transaction. Absent fields keep their current value.
///
/// The account sides distinguish an absent field (keep) from an explicit `null`
/// (clear the side, making the transaction uncategorized again).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionUpdate {
    /// Replacement name
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement amount
    #[serde(default, deserialize_with = "parse::optional_flexible_f64")]
    pub amount: Option<f64>,
    /// `Some(None)` clears the debit side
    #[serde(default, deserialize_with = "parse::nullable_flexible_i64")]
    pub debit_account_id: Option<Option<i64>>,
    /// `Some(None)` clears the credit side
    #[serde(default, deserialize_with = "parse::nullable_flexible_i64")]
    pub credit_account_id: Option<Option<i64>>,
    /// Replacement transaction date
    #[serde(default, deserialize_with = "parse::optional_date_time")]
    pub transaction_date: Option<NaiveDateTime>,
}

/// Which side of a transaction a category is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The debit side
    Debit,
    /// The credit side
    Credit,
}

/// One item of a batch categorize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CategorizeRequest {
    /// Transaction to categorize
    #[serde(deserialize_with = "parse::flexible_i64")]
    pub transaction_id: i64,
    /// Account to place on the chosen side
    #[serde(deserialize_with = "parse::flexible_i64")]
    pub category_id: i64,
    /// Side to fill in
    pub debit_or_credit: Side,
}

/// Restricts transaction listings by categorization state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorizeFilter {
    /// Every transaction
    #[default]
    All,
    /// Only transactions with at least one side unset
    Uncategorized,
    /// Only transactions with both sides set
    Categorized,
}

impl CategorizeFilter {
    /// Parses the `categorize_type` query value. Anything unrecognized lists everything.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("uncategorized") => Self::Uncategorized,
            Some("categorized") => Self::Categorized,
            _ => Self::All,
        }
    }

    fn condition(self) -> Option<Condition> {
        match self {
            Self::All => None,
            Self::Uncategorized => Some(
                Condition::any()
                    .add(transaction::Column::DebitAccountId.is_null())
                    .add(transaction::Column::CreditAccountId.is_null()),
            ),
            Self::Categorized => Some(
                Condition::all()
                    .add(transaction::Column::DebitAccountId.is_not_null())
                    .add(transaction::Column::CreditAccountId.is_not_null()),
            ),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Transaction name cannot be empty"));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(round_cents(amount))
}

fn validate_sides(debit_account_id: Option<i64>, credit_account_id: Option<i64>) -> Result<()> {
    match (debit_account_id, credit_account_id) {
        (Some(debit), Some(credit)) if debit == credit => Err(Error::validation(format!(
            "A transaction cannot debit and credit the same account ({debit})"
        ))),
        _ => Ok(()),
    }
}

fn involving_accounts(account_ids: &[i64]) -> Condition {
    Condition::any()
        .add(transaction::Column::DebitAccountId.is_in(account_ids.iter().copied()))
        .add(transaction::Column::CreditAccountId.is_in(account_ids.iter().copied()))
}

/// Lists transactions referencing any of the accounts on either side, ordered by date.
///
/// # Errors
/// Returns a validation error when `account_ids` is empty.
pub async fn get_transactions_by_account(
    db: &DatabaseConnection,
    account_ids: &[i64],
    filter: CategorizeFilter,
) -> Result<Vec<transaction::Model>> {
    if account_ids.is_empty() {
        return Err(Error::validation("No account_ids found in the request."));
    }

    let mut query = Transaction::find().filter(involving_accounts(account_ids));
    if let Some(condition) = filter.condition() {
        query = query.filter(condition);
    }

    query
        .order_by_asc(transaction::Column::TransactionDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every transaction referencing any of the accounts, categorized or not.
///
/// This is the input the balance engine works from.
pub async fn get_transactions_for_accounts<C>(
    db: &C,
    account_ids: &[i64],
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    if account_ids.is_empty() {
        return Ok(Vec::new());
    }

    Transaction::find()
        .filter(involving_accounts(account_ids))
        .order_by_asc(transaction::Column::TransactionDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new transaction.
///
/// The amount is rounded to cents and `date_entered` is set to now. Either side may be
/// left unset; setting both to the same account is rejected.
///
/// # Errors
/// Returns an error if:
/// - The name is empty
/// - The amount is negative, NaN or infinite
/// - Both sides reference the same account
/// - A side references an account that does not exist (foreign key violation)
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    validate_name(&new.name)?;
    let amount = validate_amount(new.amount)?;
    validate_sides(new.debit_account_id, new.credit_account_id)?;

    let transaction = transaction::ActiveModel {
        name: Set(new.name),
        description: Set(new.description),
        amount: Set(amount),
        debit_account_id: Set(new.debit_account_id),
        credit_account_id: Set(new.credit_account_id),
        transaction_date: Set(new.transaction_date),
        date_entered: Set(now()),
        ..Default::default()
    };

    let created = transaction.insert(db).await?;
    tracing::info!("Created transaction {} '{}' for {:.2}", created.id, created.name, created.amount);
    Ok(created)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id<C>(db: &C, transaction_id: i64) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_transaction_by_id`], but a missing transaction is an error.
pub async fn require_transaction<C>(db: &C, transaction_id: i64) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        })
}

/// Places `category_id` on one side of a transaction, leaving the other side untouched.
pub async fn categorize_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    side: Side,
    category_id: i64,
) -> Result<transaction::Model> {
    let existing = require_transaction(db, transaction_id).await?;

    let (debit, credit) = match side {
        Side::Debit => (Some(category_id), existing.credit_account_id),
        Side::Credit => (existing.debit_account_id, Some(category_id)),
    };
    validate_sides(debit, credit)?;

    let mut active: transaction::ActiveModel = existing.into();
    active.debit_account_id = Set(debit);
    active.credit_account_id = Set(credit);

    let updated = active.update(db).await?;
    tracing::info!("Categorized transaction {} ({:?} -> {})", transaction_id, side, category_id);
    Ok(updated)
}

/// Applies a partial update to a transaction and refreshes `date_entered`.
///
/// Provided values replace the stored ones even when they are zero or empty, and are
/// validated exactly as on creation.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    update: TransactionUpdate,
) -> Result<transaction::Model> {
    let existing = require_transaction(db, transaction_id).await?;

    let debit = update.debit_account_id.unwrap_or(existing.debit_account_id);
    let credit = update.credit_account_id.unwrap_or(existing.credit_account_id);
    validate_sides(debit, credit)?;

    let mut active: transaction::ActiveModel = existing.into();

    if let Some(name) = update.name {
        validate_name(&name)?;
        active.name = Set(name);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(amount) = update.amount {
        active.amount = Set(validate_amount(amount)?);
    }
    if let Some(transaction_date) = update.transaction_date {
        active.transaction_date = Set(transaction_date);
    }
    active.debit_account_id = Set(debit);
    active.credit_account_id = Set(credit);
    active.date_entered = Set(now());

    let updated = active.update(db).await?;
    tracing::info!("Updated transaction {}", transaction_id);
    Ok(updated)
}

/// Deletes a transaction.
///
/// # Errors
/// Returns a not-found error when no transaction has this id.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        });
    }

    tracing::info!("Deleted transaction {}", transaction_id);
    Ok(())
}

/// Adds each item as a new transaction. Failures are keyed by item index.
pub async fn add_transactions(db: &DatabaseConnection, items: Vec<Value>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, item) in items.into_iter().enumerate() {
        let result = match serde_json::from_value::<NewTransaction>(item) {
            Ok(new) => create_transaction(db, new).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(created) => outcome.record_success(created.id),
            Err(e) => outcome.record_failure(index_key(index), e),
        }
    }

    outcome
}

/// Categorizes each item. Failures are keyed by item index.
pub async fn categorize_transactions(db: &DatabaseConnection, items: Vec<Value>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, item) in items.into_iter().enumerate() {
        let result = match serde_json::from_value::<CategorizeRequest>(item) {
            Ok(request) => {
                categorize_transaction(
                    db,
                    request.transaction_id,
                    request.debit_or_credit,
                    request.category_id,
                )
                .await
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(updated) => outcome.record_success(updated.id),
            Err(e) => outcome.record_failure(index_key(index), e),
        }
    }

    outcome
}

#[derive(Deserialize)]
struct ItemId {
    #[serde(alias = "transaction_id", deserialize_with = "parse::flexible_i64")]
    id: i64,
}

async fn update_item(db: &DatabaseConnection, item: &Value) -> Result<transaction::Model> {
    let ItemId { id } = ItemId::deserialize(item)?;
    let update = TransactionUpdate::deserialize(item)?;
    update_transaction(db, id, update).await
}

/// Applies each item as a partial update. The target id is read from `id`
/// (or `transaction_id`); failures are keyed by item index.
pub async fn update_transactions(db: &DatabaseConnection, items: Vec<Value>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, item) in items.into_iter().enumerate() {
        match update_item(db, &item).await {
            Ok(updated) => outcome.record_success(updated.id),
            Err(e) => outcome.record_failure(index_key(index), e),
        }
    }

    outcome
}

/// Deletes each transaction. Ids may be numbers or numeric strings.
///
/// Failures are keyed by transaction id; an entry that is not an id at all is keyed
/// by its index in the request.
pub async fn remove_transactions(
    db: &DatabaseConnection,
    transaction_ids: &[Value],
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, raw) in transaction_ids.iter().enumerate() {
        let transaction_id = match parse::flexible_i64(raw) {
            Ok(id) => id,
            Err(e) => {
                outcome.record_failure(index_key(index), e);
                continue;
            }
        };

        match delete_transaction(db, transaction_id).await {
            Ok(()) => outcome.record_success(transaction_id),
            Err(e) => outcome.record_failure(transaction_id, e),
        }
    }

    outcome
}
