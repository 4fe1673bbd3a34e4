//! SQL implementation of the fund repository

use crate::error::DbError;
use crate::repositories::fund::{Fund, FundRepository};
use crate::DbClient;
use givepoint_common::services::BoxFuture;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the fund repository
#[derive(Debug, Clone)]
pub struct SqlFundRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlFundRepository {
    /// Create a new SQL fund repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &sqlx::any::AnyRow) -> Result<Fund, DbError> {
        Ok(Fund {
            id: row.try_get("id").map_err(|e| DbError::QueryError(e.to_string()))?,
            name: row.try_get("name").unwrap_or_default(),
            is_active: row.try_get::<i64, _>("is_active").unwrap_or(0) != 0,
        })
    }
}

impl FundRepository for SqlFundRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing fund schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS funds (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1
                )
            "#;

            self.db_client.execute(query).await?;

            info!("Fund schema initialized successfully");
            Ok(())
        })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Fund>, DbError> {
        Box::pin(async move {
            debug!("Finding fund by id: {}", id);

            let query = r#"
                SELECT id, name, is_active
                FROM funds
                WHERE id = $1 AND is_active <> 0
            "#;

            let result = sqlx::query(query)
                .bind(id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find fund: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            result.as_ref().map(Self::map_row).transpose()
        })
    }

    fn create(&self, name: &str) -> BoxFuture<'_, Fund, DbError> {
        let name = name.to_string();
        Box::pin(async move {
            debug!("Creating fund: {}", name);

            let query = r#"
                INSERT INTO funds (name, is_active)
                VALUES ($1, 1)
                RETURNING id, name, is_active
            "#;

            let row = sqlx::query(query)
                .bind(&name)
                .fetch_one(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert fund: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            info!("Fund created successfully");
            Self::map_row(&row)
        })
    }
}
