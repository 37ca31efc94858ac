//! Shared test utilities for the budget book backend.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults, plus a small seeded ledger
//! (a credit card, a savings account and two expense categories) that most
//! service tests start from.

use crate::{
    core::{
        account::{self, AccountTypeRef, NewAccount},
        account_type,
        transaction::{self, NewTransaction},
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Midnight on the given day.
#[allow(clippy::expect_used)]
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid test date")
}

/// Creates a test account type in the given group.
pub async fn create_test_account_type(
    db: &DatabaseConnection,
    name: &str,
    group: &str,
) -> Result<entities::account_type::Model> {
    account_type::create_account_type(db, name, Some(group)).await
}

/// Creates a test account referencing an existing account type.
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
    account_type_id: i64,
    debit_inc: bool,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        NewAccount {
            name: name.to_string(),
            account_type: AccountTypeRef::Existing(account_type_id),
            debit_inc,
        },
    )
    .await
}

/// Creates a test transaction.
///
/// # Defaults
/// * `description`: `"Test transaction"`
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
    debit_account_id: Option<i64>,
    credit_account_id: Option<i64>,
    transaction_date: NaiveDateTime,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        NewTransaction {
            name: name.to_string(),
            description: "Test transaction".to_string(),
            amount,
            debit_account_id,
            credit_account_id,
            transaction_date,
        },
    )
    .await
}

/// A seeded ledger shared by the service tests.
pub struct Ledger {
    /// Database holding the ledger, shareable with a router
    pub db: Arc<DatabaseConnection>,
    /// Credit card, `debit_inc = false`
    pub amex: entities::account::Model,
    /// Savings account, `debit_inc = true`
    pub savings: entities::account::Model,
    /// Expense category, `debit_inc = true`
    pub gas: entities::account::Model,
    /// Expense category, `debit_inc = true`
    pub rent: entities::account::Model,
    /// In insertion order:
    /// 0. 123.45 credited to AMEX, uncategorized, 2023-02-21
    /// 1. 78.90 credited to Savings, uncategorized, 2023-02-25
    /// 2. 67.50 Gas <- AMEX, 2023-02-27
    /// 3. 1250.00 Rent <- Savings, 2023-03-01
    /// 4. 78.90 AMEX <- Savings (card payment), 2023-02-24
    pub transactions: Vec<entities::transaction::Model>,
}

/// Sets up a database holding the [`Ledger`] fixture.
pub async fn setup_ledger() -> Result<Ledger> {
    let db = setup_test_db().await?;

    let credit_card = create_test_account_type(&db, "Credit Card", "Liabilities").await?;
    let savings_type = create_test_account_type(&db, "Savings Account", "Assets").await?;
    let gas_type = create_test_account_type(&db, "Gas", "Expenses").await?;
    let rent_type = create_test_account_type(&db, "Rent", "Expenses").await?;

    let amex = create_test_account(&db, "AMEX", credit_card.id, false).await?;
    let savings = create_test_account(&db, "Chase Savings", savings_type.id, true).await?;
    let gas = create_test_account(&db, "Gas for Car", gas_type.id, true).await?;
    let rent = create_test_account(&db, "Apartment Rent", rent_type.id, true).await?;

    let transactions = vec![
        create_test_transaction(
            &db,
            "Uncategorized Test Transaction",
            123.45,
            None,
            Some(amex.id),
            date(2023, 2, 21),
        )
        .await?,
        create_test_transaction(
            &db,
            "Uncategorized CC Payment",
            78.90,
            None,
            Some(savings.id),
            date(2023, 2, 25),
        )
        .await?,
        create_test_transaction(
            &db,
            "Costco Gas",
            67.50,
            Some(gas.id),
            Some(amex.id),
            date(2023, 2, 27),
        )
        .await?,
        create_test_transaction(
            &db,
            "March Rent",
            1250.0,
            Some(rent.id),
            Some(savings.id),
            date(2023, 3, 1),
        )
        .await?,
        create_test_transaction(
            &db,
            "Credit Card Payment",
            78.90,
            Some(amex.id),
            Some(savings.id),
            date(2023, 2, 24),
        )
        .await?,
    ];

    Ok(Ledger {
        db: Arc::new(db),
        amex,
        savings,
        gas,
        rent,
        transactions,
    })
}
