//! SQL implementation of the saved account repository

use crate::error::DbError;
use crate::repositories::saved_account::{NewSavedAccount, SavedAccount, SavedAccountRepository};
use crate::DbClient;
use givepoint_common::services::BoxFuture;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the saved account repository
#[derive(Debug, Clone)]
pub struct SqlSavedAccountRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlSavedAccountRepository {
    /// Create a new SQL saved account repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &sqlx::any::AnyRow) -> Result<SavedAccount, DbError> {
        Ok(SavedAccount {
            id: row.try_get("id").map_err(|e| DbError::QueryError(e.to_string()))?,
            person_id: row
                .try_get("person_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            name: row.try_get("name").unwrap_or_default(),
            masked_number: row.try_get("masked_number").unwrap_or_default(),
            reference_number: row.try_get("reference_number").unwrap_or_default(),
            transaction_code: row.try_get("transaction_code").unwrap_or_default(),
            currency_kind: row.try_get("currency_kind").unwrap_or_default(),
        })
    }
}

impl SavedAccountRepository for SqlSavedAccountRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing saved account schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS saved_accounts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    person_id INTEGER NOT NULL REFERENCES persons(id),
                    name TEXT NOT NULL,
                    masked_number TEXT NOT NULL,
                    reference_number TEXT NOT NULL,
                    transaction_code TEXT NOT NULL,
                    currency_kind TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE(person_id, masked_number)
                )
            "#;

            self.db_client.execute(query).await?;

            info!("Saved account schema initialized successfully");
            Ok(())
        })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<SavedAccount>, DbError> {
        Box::pin(async move {
            debug!("Finding saved account by id: {}", id);

            let query = r#"
                SELECT id, person_id, name, masked_number, reference_number,
                       transaction_code, currency_kind
                FROM saved_accounts
                WHERE id = $1
            "#;

            let result = sqlx::query(query)
                .bind(id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find saved account: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            result.as_ref().map(Self::map_row).transpose()
        })
    }

    fn find_by_person_and_mask(
        &self,
        person_id: i64,
        masked_number: &str,
    ) -> BoxFuture<'_, Option<SavedAccount>, DbError> {
        let masked_number = masked_number.to_string();
        Box::pin(async move {
            debug!(
                "Finding saved account for person {} and mask {}",
                person_id, masked_number
            );

            let query = r#"
                SELECT id, person_id, name, masked_number, reference_number,
                       transaction_code, currency_kind
                FROM saved_accounts
                WHERE person_id = $1 AND masked_number = $2
            "#;

            let result = sqlx::query(query)
                .bind(person_id)
                .bind(&masked_number)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find saved account: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            result.as_ref().map(Self::map_row).transpose()
        })
    }

    fn create(&self, account: NewSavedAccount) -> BoxFuture<'_, SavedAccount, DbError> {
        Box::pin(async move {
            debug!(
                "Creating saved account {} for person {}",
                account.masked_number, account.person_id
            );

            let query = r#"
                INSERT INTO saved_accounts
                    (person_id, name, masked_number, reference_number, transaction_code, currency_kind)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, person_id, name, masked_number, reference_number,
                          transaction_code, currency_kind
            "#;

            let row = sqlx::query(query)
                .bind(account.person_id)
                .bind(&account.name)
                .bind(&account.masked_number)
                .bind(&account.reference_number)
                .bind(&account.transaction_code)
                .bind(&account.currency_kind)
                .fetch_one(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert saved account: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            info!("Saved account created successfully");
            Self::map_row(&row)
        })
    }
}
