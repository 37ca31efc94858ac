//! Matching engine - finds likely duplicates of a transaction.
//!
//! The same purchase often shows up twice: once imported from the card statement and
//! once from the bank account that paid it. A candidate matches when its amount is
//! identical and its date falls within a few days of the reference transaction.

use crate::{
    core::transaction::require_transaction,
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::TimeDelta;
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};

/// Days either side of the reference date searched when no threshold is given.
pub const DEFAULT_DAY_THRESHOLD: i64 = 2;

/// Ids of transactions that may duplicate `transaction_id`, ordered by date then id.
///
/// Candidates have exactly the same amount and a date within `day_threshold` days of the
/// reference (both ends inclusive). With `uncategorized_only`, candidates must also have
/// at least one side unset. The reference transaction itself is never returned.
///
/// # Errors
/// Returns an error if:
/// - `day_threshold` is negative or too large to form a date range
/// - No transaction has this id
pub async fn find_matching_transactions<C>(
    db: &C,
    transaction_id: i64,
    day_threshold: i64,
    uncategorized_only: bool,
) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    if day_threshold < 0 {
        return Err(Error::validation(format!(
            "day_threshold must not be negative, got {day_threshold}"
        )));
    }
    let threshold = TimeDelta::try_days(day_threshold)
        .ok_or_else(|| Error::validation(format!("day_threshold {day_threshold} is too large")))?;

    let reference = require_transaction(db, transaction_id).await?;

    let out_of_range = || Error::validation(format!("day_threshold {day_threshold} is too large"));
    let earliest = reference
        .transaction_date
        .checked_sub_signed(threshold)
        .ok_or_else(out_of_range)?;
    let latest = reference
        .transaction_date
        .checked_add_signed(threshold)
        .ok_or_else(out_of_range)?;

    let mut query = Transaction::find()
        .select_only()
        .column(transaction::Column::Id)
        .filter(transaction::Column::Id.ne(reference.id))
        .filter(transaction::Column::Amount.eq(reference.amount))
        .filter(transaction::Column::TransactionDate.between(earliest, latest));

    if uncategorized_only {
        query = query.filter(
            Condition::any()
                .add(transaction::Column::DebitAccountId.is_null())
                .add(transaction::Column::CreditAccountId.is_null()),
        );
    }

    let matches = query
        .order_by_asc(transaction::Column::TransactionDate)
        .order_by_asc(transaction::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await?;

    tracing::debug!(
        "Transaction {} has {} candidate match(es) within {} day(s)",
        transaction_id,
        matches.len(),
        day_threshold
    );
    Ok(matches)
}
