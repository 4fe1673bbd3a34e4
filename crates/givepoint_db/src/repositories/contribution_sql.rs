//! SQL implementation of the contribution repository

use crate::error::DbError;
use crate::repositories::contribution::{
    Contribution, ContributionDetail, ContributionRepository, NewContribution,
};
use crate::DbClient;
use givepoint_common::services::BoxFuture;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the contribution repository
#[derive(Debug, Clone)]
pub struct SqlContributionRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlContributionRepository {
    /// Create a new SQL contribution repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ContributionRepository for SqlContributionRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing contribution schema");

            let contributions = r#"
                CREATE TABLE IF NOT EXISTS contributions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    person_id INTEGER NOT NULL REFERENCES persons(id),
                    transaction_code TEXT NOT NULL,
                    currency_kind TEXT NOT NULL,
                    total_amount INTEGER NOT NULL,
                    transacted_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#;

            let details = r#"
                CREATE TABLE IF NOT EXISTS contribution_details (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    contribution_id INTEGER NOT NULL REFERENCES contributions(id),
                    fund_id INTEGER NOT NULL REFERENCES funds(id),
                    amount INTEGER NOT NULL
                )
            "#;

            self.db_client.execute(contributions).await?;
            self.db_client.execute(details).await?;

            info!("Contribution schema initialized successfully");
            Ok(())
        })
    }

    fn record(&self, contribution: NewContribution) -> BoxFuture<'_, Contribution, DbError> {
        Box::pin(async move {
            debug!(
                "Recording contribution for person {} with {} line items",
                contribution.person_id,
                contribution.details.len()
            );

            let mut tx = self.db_client.begin().await?;

            let header = sqlx::query(
                r#"
                INSERT INTO contributions (person_id, transaction_code, currency_kind, total_amount)
                VALUES ($1, $2, $3, $4)
                RETURNING id
            "#,
            )
            .bind(contribution.person_id)
            .bind(&contribution.transaction_code)
            .bind(&contribution.currency_kind)
            .bind(contribution.total_amount)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert contribution: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            let contribution_id: i64 = header
                .try_get("id")
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            for detail in &contribution.details {
                sqlx::query(
                    r#"
                    INSERT INTO contribution_details (contribution_id, fund_id, amount)
                    VALUES ($1, $2, $3)
                "#,
                )
                .bind(contribution_id)
                .bind(detail.fund_id)
                .bind(detail.amount)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to insert contribution detail: {}", e);
                    DbError::QueryError(e.to_string())
                })?;
            }

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            info!("Contribution recorded successfully");
            Ok(Contribution {
                id: contribution_id,
                person_id: contribution.person_id,
                transaction_code: contribution.transaction_code,
                currency_kind: contribution.currency_kind,
                total_amount: contribution.total_amount,
            })
        })
    }

    fn details_for(
        &self,
        contribution_id: i64,
    ) -> BoxFuture<'_, Vec<ContributionDetail>, DbError> {
        Box::pin(async move {
            debug!("Loading details for contribution {}", contribution_id);

            let query = r#"
                SELECT id, contribution_id, fund_id, amount
                FROM contribution_details
                WHERE contribution_id = $1
            "#;

            let rows = sqlx::query(query)
                .bind(contribution_id)
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to load contribution details: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter()
                .map(|row| {
                    Ok(ContributionDetail {
                        id: row
                            .try_get("id")
                            .map_err(|e| DbError::QueryError(e.to_string()))?,
                        contribution_id: row
                            .try_get("contribution_id")
                            .map_err(|e| DbError::QueryError(e.to_string()))?,
                        fund_id: row
                            .try_get("fund_id")
                            .map_err(|e| DbError::QueryError(e.to_string()))?,
                        amount: row
                            .try_get("amount")
                            .map_err(|e| DbError::QueryError(e.to_string()))?,
                    })
                })
                .collect()
        })
    }
}
