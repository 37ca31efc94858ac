//! Account type business logic - listing, creating and seeding account types.
//!
//! Account types are created explicitly, implicitly when an account is created with a
//! new type label, or from the seed list in config.toml. They are never deleted
//! automatically.

use crate::{
    config::account_types::AccountTypeConfig,
    entities::{AccountType, account_type},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, Func},
};

/// Group assigned when none is given.
pub const DEFAULT_GROUP: &str = "Misc.";

/// Lists account types ordered by name, optionally restricted to one group.
///
/// The group comparison ignores case, so `?group=liabilities` finds "Liabilities".
/// `None` or `"all"` lists every account type.
pub async fn get_account_types(
    db: &DatabaseConnection,
    group: Option<&str>,
) -> Result<Vec<account_type::Model>> {
    let mut query = AccountType::find();

    if let Some(group) = group.filter(|g| !g.eq_ignore_ascii_case("all")) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(account_type::Column::GroupName)))
                .eq(group.trim().to_lowercase()),
        );
    }

    query
        .order_by_asc(account_type::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an account type by its exact name.
pub async fn get_account_type_by_name<C>(
    db: &C,
    name: &str,
) -> Result<Option<account_type::Model>>
where
    C: ConnectionTrait,
{
    AccountType::find()
        .filter(account_type::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new account type, trimming the name and defaulting the group to `"Misc."`.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - An account type with the same name already exists (uniqueness violation)
pub async fn create_account_type<C>(
    db: &C,
    name: &str,
    group: Option<&str>,
) -> Result<account_type::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Account type name cannot be empty"));
    }

    let group = group
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GROUP);

    let account_type = account_type::ActiveModel {
        name: Set(name.to_string()),
        group_name: Set(group.to_string()),
        ..Default::default()
    };

    let created = account_type.insert(db).await?;
    tracing::info!("Created account type '{}' in group '{}'", created.name, created.group_name);
    Ok(created)
}

/// Returns the account type with this name, creating it in the `"Misc."` group if needed.
///
/// Pass a `DatabaseTransaction` to make the lookup and insert part of a larger unit of work.
pub async fn get_or_create_account_type<C>(db: &C, name: &str) -> Result<account_type::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_account_type_by_name(db, name.trim()).await? {
        return Ok(existing);
    }

    create_account_type(db, name, None).await
}

/// Inserts the configured account types that do not exist yet; returns how many were added.
pub async fn seed_account_types(
    db: &DatabaseConnection,
    account_types: &[AccountTypeConfig],
) -> Result<usize> {
    let mut created = 0;

    for config in account_types {
        if get_account_type_by_name(db, config.name.trim()).await?.is_some() {
            continue;
        }
        create_account_type(db, &config.name, Some(&config.group)).await?;
        created += 1;
    }

    Ok(created)
}
