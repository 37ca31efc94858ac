//! Reporting - net change of every account in a set of account groups over date ranges.

use crate::{
    core::{
        balance::{self, BalanceWindow},
        parse::parse_date,
        transaction::get_transactions_for_accounts,
    },
    entities::{Account, AccountType, account_type},
    errors::{Error, Result},
};
use chrono::{Local, NaiveDate};
use sea_orm::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Account name to one net change per requested range.
pub type AccountChanges = BTreeMap<String, Vec<f64>>;

/// Group name to account type name to account changes.
pub type GroupChanges = BTreeMap<String, BTreeMap<String, AccountChanges>>;

/// Net changes per account, nested by group and account type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNetChangeReport {
    /// The range boundaries used, as `YYYY-MM-DD`, in `[start, end]` pairs
    pub dates: Vec<String>,
    /// Every requested group, even the ones without accounts
    pub groups: GroupChanges,
}

fn resolve_ranges(date_ranges: &[String]) -> Result<Vec<NaiveDate>> {
    let mut dates = date_ranges
        .iter()
        .map(|raw| parse_date(raw))
        .collect::<Result<Vec<_>>>()?;

    match dates.len() {
        0 => {
            dates.push(balance::beginning_of_time().date());
            dates.push(Local::now().date_naive());
        }
        1 => dates.insert(0, balance::beginning_of_time().date()),
        n if n % 2 == 1 => {
            return Err(Error::validation(format!(
                "dateRanges must hold [start, end] pairs, got {n} dates"
            )));
        }
        _ => {}
    }

    Ok(dates)
}

/// Net change (credits minus debits, no sign flip) of each account in `groups`
/// for each `[start, end]` pair in `date_ranges`.
///
/// `date_ranges` is a flat list of `YYYY-MM-DD` dates. A single date is read as
/// everything up to that day and an empty list as everything up to today.
pub async fn account_net_changes_by_group(
    db: &DatabaseConnection,
    groups: &[String],
    date_ranges: &[String],
) -> Result<GroupNetChangeReport> {
    let dates = resolve_ranges(date_ranges)?;
    let windows: Vec<BalanceWindow> = dates
        .chunks_exact(2)
        .map(|pair| BalanceWindow::from_dates(Some(pair[0]), Some(pair[1])))
        .collect();

    let mut report: GroupChanges = groups
        .iter()
        .map(|group| (group.clone(), BTreeMap::new()))
        .collect();

    let accounts = Account::find()
        .find_also_related(AccountType)
        .filter(account_type::Column::GroupName.is_in(groups.iter().cloned()))
        .all(db)
        .await?;

    let ids: Vec<i64> = accounts.iter().map(|(account, _)| account.id).collect();
    let transactions = get_transactions_for_accounts(db, &ids).await?;

    for (account, account_type) in accounts {
        let Some(account_type) = account_type else {
            continue;
        };

        let changes = windows
            .iter()
            .map(|window| balance::net_change(account.id, &transactions, window))
            .collect();

        report
            .entry(account_type.group_name)
            .or_default()
            .entry(account_type.name)
            .or_default()
            .insert(account.name, changes);
    }

    Ok(GroupNetChangeReport {
        dates: dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
        groups: report,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_report_uses_raw_net_change() -> Result<()> {
        let ledger = setup_ledger().await?;

        let report = account_net_changes_by_group(
            &*ledger.db,
            &strings(&["Expenses", "Liabilities"]),
            &strings(&["2023-02-01", "2023-02-28", "2023-03-01", "2023-03-31"]),
        )
        .await?;

        assert_eq!(
            report.dates,
            strings(&["2023-02-01", "2023-02-28", "2023-03-01", "2023-03-31"])
        );

        let expenses = &report.groups["Expenses"];
        assert_eq!(expenses["Gas"]["Gas for Car"], vec![-67.5, 0.0]);
        assert_eq!(expenses["Rent"]["Apartment Rent"], vec![0.0, -1250.0]);

        let liabilities = &report.groups["Liabilities"];
        assert_eq!(liabilities["Credit Card"]["AMEX"], vec![-11.4, 0.0]);

        assert!(!report.groups.contains_key("Assets"));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_single_date_and_empty_group() -> Result<()> {
        let ledger = setup_ledger().await?;

        let report = account_net_changes_by_group(
            &*ledger.db,
            &strings(&["Assets", "Income"]),
            &strings(&["2023-02-28"]),
        )
        .await?;

        assert_eq!(report.dates, strings(&["0001-01-01", "2023-02-28"]));
        assert_eq!(report.groups["Assets"]["Savings Account"]["Chase Savings"], vec![78.9]);
        assert!(report.groups["Income"].is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_report_default_range_runs_to_today() -> Result<()> {
        let ledger = setup_ledger().await?;

        let report =
            account_net_changes_by_group(&*ledger.db, &strings(&["Expenses"]), &[]).await?;

        assert_eq!(report.dates.len(), 2);
        assert_eq!(report.dates[0], "0001-01-01");
        assert_eq!(report.groups["Expenses"]["Rent"]["Apartment Rent"], vec![-1250.0]);

        Ok(())
    }

    #[tokio::test]
    async fn test_report_rejects_odd_ranges_and_bad_dates() -> Result<()> {
        let ledger = setup_ledger().await?;
        let groups = strings(&["Expenses"]);

        let result = account_net_changes_by_group(
            &*ledger.db,
            &groups,
            &strings(&["2023-01-01", "2023-01-31", "2023-02-01"]),
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let result =
            account_net_changes_by_group(&*ledger.db, &groups, &strings(&["last tuesday"])).await;
        assert!(matches!(result, Err(Error::Date(_))));

        Ok(())
    }
}
