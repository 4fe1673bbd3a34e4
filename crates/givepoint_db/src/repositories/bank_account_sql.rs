//! SQL implementation of the bank account repository

use crate::error::DbError;
use crate::repositories::bank_account::{BankAccount, BankAccountRepository, NewBankAccount};
use crate::DbClient;
use givepoint_common::services::BoxFuture;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the bank account repository
#[derive(Debug, Clone)]
pub struct SqlBankAccountRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlBankAccountRepository {
    /// Create a new SQL bank account repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &sqlx::any::AnyRow) -> Result<BankAccount, DbError> {
        Ok(BankAccount {
            id: row.try_get("id").map_err(|e| DbError::QueryError(e.to_string()))?,
            person_id: row
                .try_get("person_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            masked_number: row.try_get("masked_number").unwrap_or_default(),
            account_hash: row.try_get("account_hash").unwrap_or_default(),
        })
    }
}

impl BankAccountRepository for SqlBankAccountRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing bank account schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS bank_accounts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    person_id INTEGER NOT NULL REFERENCES persons(id),
                    masked_number TEXT NOT NULL,
                    account_hash TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE (person_id, account_hash)
                )
            "#;

            self.db_client.execute(query).await?;

            info!("Bank account schema initialized successfully");
            Ok(())
        })
    }

    fn find_by_person_and_hash(
        &self,
        person_id: i64,
        account_hash: &str,
    ) -> BoxFuture<'_, Option<BankAccount>, DbError> {
        // Clone the values to avoid lifetime issues
        let account_hash = account_hash.to_string();
        Box::pin(async move {
            debug!("Finding bank account by hash for person {}", person_id);

            let query = r#"
                SELECT id, person_id, masked_number, account_hash
                FROM bank_accounts
                WHERE person_id = $1 AND account_hash = $2
            "#;

            let result = sqlx::query(query)
                .bind(person_id)
                .bind(&account_hash)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find bank account: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            result.as_ref().map(Self::map_row).transpose()
        })
    }

    fn create(&self, account: NewBankAccount) -> BoxFuture<'_, BankAccount, DbError> {
        Box::pin(async move {
            debug!("Creating bank account for person {}", account.person_id);

            let query = r#"
                INSERT INTO bank_accounts (person_id, masked_number, account_hash)
                VALUES ($1, $2, $3)
                RETURNING id, person_id, masked_number, account_hash
            "#;

            let row = sqlx::query(query)
                .bind(account.person_id)
                .bind(&account.masked_number)
                .bind(&account.account_hash)
                .fetch_one(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert bank account: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            info!("Bank account created successfully");
            Self::map_row(&row)
        })
    }
}
