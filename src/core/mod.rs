//! Core business logic - framework-agnostic account, transaction, balance and report operations.
//!
//! The HTTP layer only translates requests into calls on these modules.

/// Account creation, listing with balances, updates and removal
pub mod account;
/// Account type listing, creation and seeding
pub mod account_type;
/// Pure balance computations over transaction history
pub mod balance;
/// Per-item outcome tracking for batch operations
pub mod batch;
/// Duplicate detection by amount and date proximity
pub mod matching;
/// Lenient parsing of ids, amounts and dates in payloads
pub mod parse;
/// Net change reports by account group
pub mod report;
/// Transaction CRUD and batch operations
pub mod transaction;
