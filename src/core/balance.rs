//! Balance engine - derives account balances from transaction history.
//!
//! Nothing here touches the database. Callers load the transactions that reference an
//! account (see `core::transaction::get_transactions_for_accounts`) and hand them in,
//! which keeps the sign convention and the window rules testable in isolation.
//!
//! The sign convention: the net change of an account is the sum of the amounts where it
//! is the credit side minus the sum where it is the debit side. For accounts where a
//! debit increases the balance (`debit_inc`), that figure is negated.

use crate::entities::{account, transaction};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Inclusive date window used for balance and uncategorized queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceWindow {
    /// First instant included
    pub start: NaiveDateTime,
    /// Last instant included
    pub end: NaiveDateTime,
}

impl BalanceWindow {
    /// Window between two instants, both inclusive.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Window covering whole days: from the start of `start` to the end of `end`.
    ///
    /// A missing start means the beginning of time, a missing end means now.
    #[must_use]
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map_or_else(beginning_of_time, |date| date.and_time(NaiveTime::MIN)),
            end: end.map_or_else(now, end_of_day),
        }
    }

    /// True when `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for BalanceWindow {
    /// Beginning of time up to now.
    fn default() -> Self {
        Self::new(beginning_of_time(), now())
    }
}

/// `0001-01-01 00:00:00`, the earliest date a balance window starts at.
#[must_use]
pub fn beginning_of_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Current local time without a timezone, matching how transaction dates are stored.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Rounds to whole cents. Adding `0.0` turns a `-0.0` result into `0.0`.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Credits minus debits for `account_id` over fully categorized transactions in the window.
///
/// Transactions with either side unset are skipped entirely: they are waiting to be
/// categorized and do not move any balance yet.
#[must_use]
pub fn net_change(
    account_id: i64,
    transactions: &[transaction::Model],
    window: &BalanceWindow,
) -> f64 {
    let (credits, debits) = transactions
        .iter()
        .filter(|t| !t.is_uncategorized() && window.contains(t.transaction_date))
        .fold((0.0, 0.0), |(credits, debits), t| {
            let credit = if t.credit_account_id == Some(account_id) { t.amount } else { 0.0 };
            let debit = if t.debit_account_id == Some(account_id) { t.amount } else { 0.0 };
            (credits + credit, debits + debit)
        });

    round_cents(credits - debits)
}

/// Balance of `account` over the window, with the debit-increase sign convention applied.
#[must_use]
pub fn net_balance(
    account: &account::Model,
    transactions: &[transaction::Model],
    window: &BalanceWindow,
) -> f64 {
    let change = net_change(account.id, transactions, window);

    if account.debit_inc {
        round_cents(-change)
    } else {
        change
    }
}

/// Uncategorized transactions referencing `account` dated within the window.
#[must_use]
pub fn uncategorized(
    account: &account::Model,
    transactions: &[transaction::Model],
    window: &BalanceWindow,
) -> Vec<transaction::Model> {
    transactions
        .iter()
        .filter(|t| {
            t.involves(account.id) && t.is_uncategorized() && window.contains(t.transaction_date)
        })
        .cloned()
        .collect()
}

/// Date of the most recent transaction referencing `account`, or now if there is none.
#[must_use]
pub fn last_updated(account: &account::Model, transactions: &[transaction::Model]) -> NaiveDateTime {
    transactions
        .iter()
        .filter(|t| t.involves(account.id))
        .map(|t| t.transaction_date)
        .max()
        .unwrap_or_else(now)
}

/// Everything the account listing reports about one account's balance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    /// Net balance over the window
    pub balance: f64,
    /// Number of uncategorized transactions in the window
    pub uncategorized_transactions: usize,
    /// Most recent transaction date (all time)
    pub last_updated: NaiveDateTime,
}

/// Computes balance, uncategorized count and last-updated date for one account.
#[must_use]
pub fn summarize(
    account: &account::Model,
    transactions: &[transaction::Model],
    window: &BalanceWindow,
) -> AccountBalance {
    AccountBalance {
        balance: net_balance(account, transactions, window),
        uncategorized_transactions: uncategorized(account, transactions, window).len(),
        last_updated: last_updated(account, transactions),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::date;

    fn account(id: i64, debit_inc: bool) -> account::Model {
        account::Model {
            id,
            name: format!("Account {id}"),
            account_type_id: 1,
            debit_inc,
        }
    }

    fn txn(
        id: i64,
        amount: f64,
        debit: Option<i64>,
        credit: Option<i64>,
        on: NaiveDateTime,
    ) -> transaction::Model {
        transaction::Model {
            id,
            name: format!("Transaction {id}"),
            description: String::new(),
            amount,
            debit_account_id: debit,
            credit_account_id: credit,
            transaction_date: on,
            date_entered: on,
        }
    }

    #[test]
    fn test_debit_increase_account_balance() {
        // Credit X = 40, debit Y = 100 -> Y - X
        let acct = account(1, true);
        let transactions = vec![
            txn(1, 40.0, Some(2), Some(1), date(2023, 1, 5)),
            txn(2, 100.0, Some(1), Some(3), date(2023, 1, 6)),
        ];

        assert_eq!(net_balance(&acct, &transactions, &BalanceWindow::default()), 60.0);
    }

    #[test]
    fn test_credit_increase_account_balance() {
        // Credit X = 40, debit Y = 100 -> X - Y
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 40.0, Some(2), Some(1), date(2023, 1, 5)),
            txn(2, 100.0, Some(1), Some(3), date(2023, 1, 6)),
        ];

        assert_eq!(net_balance(&acct, &transactions, &BalanceWindow::default()), -60.0);
    }

    #[test]
    fn test_uncategorized_transactions_excluded_from_balance() {
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 25.0, Some(2), Some(1), date(2023, 1, 5)),
            txn(2, 500.0, None, Some(1), date(2023, 1, 6)),
            txn(3, 75.0, Some(1), None, date(2023, 1, 7)),
        ];
        let window = BalanceWindow::default();

        assert_eq!(net_balance(&acct, &transactions, &window), 25.0);

        let pending = uncategorized(&acct, &transactions, &window);
        let ids: Vec<i64> = pending.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 10.0, Some(2), Some(1), date(2023, 1, 1)),
            txn(2, 20.0, Some(2), Some(1), date(2023, 1, 31)),
            txn(3, 40.0, Some(2), Some(1), date(2023, 2, 1)),
        ];
        let window = BalanceWindow::new(date(2023, 1, 1), date(2023, 1, 31));

        assert_eq!(net_balance(&acct, &transactions, &window), 30.0);
    }

    #[test]
    fn test_empty_window_balance_is_zero() {
        let acct = account(1, true);
        let transactions = vec![txn(1, 10.0, Some(1), Some(2), date(2023, 1, 1))];
        let window = BalanceWindow::new(date(2022, 1, 1), date(2022, 12, 31));

        let balance = net_balance(&acct, &transactions, &window);
        assert_eq!(balance, 0.0);
        assert!(balance.is_sign_positive());
    }

    #[test]
    fn test_balance_rounds_to_cents() {
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 67.50, Some(1), Some(2), date(2023, 2, 27)),
            txn(2, 0.1, Some(3), Some(1), date(2023, 2, 27)),
            txn(3, 0.2, Some(3), Some(1), date(2023, 2, 27)),
        ];

        assert_eq!(net_balance(&acct, &transactions, &BalanceWindow::default()), -67.2);
    }

    #[test]
    fn test_transactions_of_other_accounts_ignored() {
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 10.0, Some(2), Some(3), date(2023, 1, 1)),
            txn(2, 10.0, None, Some(3), date(2023, 1, 1)),
        ];
        let window = BalanceWindow::default();

        assert_eq!(net_balance(&acct, &transactions, &window), 0.0);
        assert!(uncategorized(&acct, &transactions, &window).is_empty());
    }

    #[test]
    fn test_last_updated() {
        let acct = account(1, false);
        let transactions = vec![
            txn(1, 10.0, Some(2), Some(1), date(2023, 2, 21)),
            txn(2, 10.0, None, Some(1), date(2023, 2, 27)),
            txn(3, 10.0, Some(1), Some(2), date(2023, 2, 24)),
            txn(4, 10.0, Some(2), Some(3), date(2024, 1, 1)),
        ];

        assert_eq!(last_updated(&acct, &transactions), date(2023, 2, 27));
    }

    #[test]
    fn test_last_updated_without_transactions_is_now() {
        let acct = account(1, false);
        let before = now();
        let updated = last_updated(&acct, &[]);
        assert!(updated >= before);
        assert!(updated <= now());
    }

    #[test]
    fn test_from_dates_covers_whole_days() {
        let window = BalanceWindow::from_dates(
            NaiveDate::from_ymd_opt(2023, 3, 1),
            NaiveDate::from_ymd_opt(2023, 3, 1),
        );
        assert!(window.contains(date(2023, 3, 1)));
        assert!(window.contains(date(2023, 3, 1) + chrono::Duration::hours(18)));
        assert!(!window.contains(date(2023, 3, 2)));
    }

    #[test]
    fn test_summarize() {
        let acct = account(1, true);
        let transactions = vec![
            txn(1, 1250.0, Some(1), Some(2), date(2023, 3, 1)),
            txn(2, 78.90, None, Some(1), date(2023, 2, 25)),
        ];

        let summary = summarize(&acct, &transactions, &BalanceWindow::default());
        assert_eq!(summary.balance, 1250.0);
        assert_eq!(summary.uncategorized_transactions, 1);
        assert_eq!(summary.last_updated, date(2023, 3, 1));
    }
}
