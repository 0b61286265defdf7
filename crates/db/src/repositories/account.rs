//! Account repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use lariledger_core::chart::{Account, Category, ChartError};
use lariledger_shared::types::pagination::Page;
use lariledger_shared::AppError;

use crate::entities::{accounts, entries};
use crate::repositories::parse_timestamp;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("account not found: {0}")]
    NotFound(String),

    /// Create would collide on the primary key.
    #[error("account already exists: {0}")]
    Duplicate(String),

    /// Deletion refused while entries reference the account.
    #[error("cannot delete account {id}: has {count} entries")]
    HasEntries {
        /// The account ID.
        id: String,
        /// How many entries reference it.
        count: u64,
    },

    /// An account invariant is violated.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Duplicate(_) => Self::Conflict(err.to_string()),
            AccountError::HasEntries { .. } => Self::Validation(err.to_string()),
            AccountError::Chart(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by category.
    pub category: Option<Category>,
    /// Filter by the system flag.
    pub is_system: Option<bool>,
    /// Limit/offset window.
    pub page: Page,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    writer: DatabaseConnection,
    reader: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(writer: DatabaseConnection, reader: DatabaseConnection) -> Self {
        Self { writer, reader }
    }

    /// Validates and inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns `Chart` on an invariant violation, `Duplicate` on an ID
    /// collision, or `Database` on storage failure.
    pub async fn create(&self, account: &Account) -> Result<Account, AccountError> {
        account.validate()?;

        let active = accounts::ActiveModel {
            id: Set(account.id.clone()),
            name: Set(account.name.clone()),
            code: Set(account.code),
            category: Set(account.category.as_str().to_string()),
            currency: Set(account.currency.clone()),
            is_system: Set(account.is_system),
            ..Default::default()
        };

        accounts::Entity::insert(active)
            .exec_without_returning(&self.writer)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    AccountError::Duplicate(account.id.clone())
                } else {
                    AccountError::Database(e)
                }
            })?;

        // Fetch back through the writer so the store-assigned created_at is
        // visible regardless of reader snapshot timing.
        let model = accounts::Entity::find_by_id(account.id.as_str())
            .one(&self.writer)
            .await?
            .ok_or_else(|| AccountError::NotFound(account.id.clone()))?;
        to_domain(model)
    }

    /// Fetches an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such account exists.
    pub async fn get(&self, id: &str) -> Result<Account, AccountError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.reader)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        to_domain(model)
    }

    /// Lists accounts matching the filter, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, AccountError> {
        let mut query = accounts::Entity::find();

        if let Some(category) = filter.category {
            query = query.filter(accounts::Column::Category.eq(category.as_str()));
        }
        if let Some(is_system) = filter.is_system {
            query = query.filter(accounts::Column::IsSystem.eq(is_system));
        }

        query = query.order_by_asc(accounts::Column::Code);

        if filter.page.is_bounded() {
            query = query.limit(filter.page.limit).offset(filter.page.offset);
        }

        let models = query.all(&self.reader).await?;
        models.into_iter().map(to_domain).collect()
    }

    /// Renames an account (display name only) and revalidates the record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing account or `Chart` when the new
    /// name violates the account invariants.
    pub async fn rename(&self, id: &str, name: &str) -> Result<Account, AccountError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.writer)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        let mut renamed = to_domain(model.clone())?;
        renamed.name = name.to_string();
        renamed.validate()?;

        let mut active: accounts::ActiveModel = model.into();
        active.name = Set(name.to_string());
        let updated = active.update(&self.writer).await?;

        to_domain(updated)
    }

    /// Deletes an account, refusing while any entry references it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing account or `HasEntries` when the
    /// zero-entries rule blocks the deletion.
    pub async fn delete(&self, id: &str) -> Result<(), AccountError> {
        let _ = self.get(id).await?;

        let count = entries::Entity::find()
            .filter(entries::Column::AccountId.eq(id))
            .count(&self.reader)
            .await?;
        if count > 0 {
            return Err(AccountError::HasEntries {
                id: id.to_string(),
                count,
            });
        }

        accounts::Entity::delete_by_id(id).exec(&self.writer).await?;
        Ok(())
    }
}

/// Converts a stored row into the domain account.
pub(crate) fn to_domain(model: accounts::Model) -> Result<Account, AccountError> {
    let category: Category = model
        .category
        .parse()
        .map_err(|e: ChartError| DbErr::Custom(e.to_string()))?;
    Ok(Account {
        id: model.id,
        name: model.name,
        code: model.code,
        category,
        currency: model.currency,
        is_system: model.is_system,
        created_at: parse_timestamp(&model.created_at)?,
    })
}
