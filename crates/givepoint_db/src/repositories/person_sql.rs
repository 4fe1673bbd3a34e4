//! SQL implementation of the person repository

use crate::error::DbError;
use crate::repositories::person::{NewPerson, Person, PersonRepository};
use crate::DbClient;
use givepoint_common::services::BoxFuture;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the person repository
#[derive(Debug, Clone)]
pub struct SqlPersonRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlPersonRepository {
    /// Create a new SQL person repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &sqlx::any::AnyRow) -> Result<Person, DbError> {
        Ok(Person {
            id: row.try_get("id").map_err(|e| DbError::QueryError(e.to_string()))?,
            family_id: row
                .try_get("family_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            first_name: row.try_get("first_name").unwrap_or_default(),
            last_name: row.try_get("last_name").unwrap_or_default(),
            email: row.try_get("email").unwrap_or_default(),
            phone_number: row.try_get("phone_number").ok(),
        })
    }

    async fn select_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Option<Person>, DbError> {
        let query = r#"
            SELECT id, family_id, first_name, last_name, email, phone_number
            FROM persons
            WHERE first_name = $1 AND last_name = $2 AND email = $3
        "#;

        let result = sqlx::query(query)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find person by identity: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        result.as_ref().map(Self::map_row).transpose()
    }
}

impl PersonRepository for SqlPersonRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing person schema");

            let families = r#"
                CREATE TABLE IF NOT EXISTS families (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    street1 TEXT,
                    street2 TEXT,
                    city TEXT,
                    state TEXT,
                    postal_code TEXT,
                    country TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#;

            let persons = r#"
                CREATE TABLE IF NOT EXISTS persons (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    family_id INTEGER NOT NULL REFERENCES families(id),
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    phone_number TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE(first_name, last_name, email)
                )
            "#;

            self.db_client.execute(families).await?;
            self.db_client.execute(persons).await?;

            info!("Person schema initialized successfully");
            Ok(())
        })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Person>, DbError> {
        Box::pin(async move {
            debug!("Finding person by id: {}", id);

            let query = r#"
                SELECT id, family_id, first_name, last_name, email, phone_number
                FROM persons
                WHERE id = $1
            "#;

            let result = sqlx::query(query)
                .bind(id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find person: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            result.as_ref().map(Self::map_row).transpose()
        })
    }

    fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> BoxFuture<'_, Option<Person>, DbError> {
        let first_name = first_name.to_string();
        let last_name = last_name.to_string();
        let email = email.to_string();
        Box::pin(async move {
            debug!("Finding person by identity: {} {}", first_name, last_name);
            self.select_by_identity(&first_name, &last_name, &email)
                .await
        })
    }

    fn create_with_family(&self, person: NewPerson) -> BoxFuture<'_, Person, DbError> {
        Box::pin(async move {
            debug!(
                "Creating person {} {} with family group",
                person.first_name, person.last_name
            );

            let mut tx = self.db_client.begin().await?;

            let family_row = sqlx::query(
                r#"
                INSERT INTO families (name, street1, street2, city, state, postal_code, country)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
            "#,
            )
            .bind(person.family_name())
            .bind(person.address.as_ref().map(|a| a.street1.clone()))
            .bind(person.address.as_ref().and_then(|a| a.street2.clone()))
            .bind(person.address.as_ref().map(|a| a.city.clone()))
            .bind(person.address.as_ref().map(|a| a.state.clone()))
            .bind(person.address.as_ref().map(|a| a.postal_code.clone()))
            .bind(person.address.as_ref().and_then(|a| a.country.clone()))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert family: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            let family_id: i64 = family_row
                .try_get("id")
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            // The identity triple is unique. On conflict the insert yields no
            // row; roll back the orphaned family and return the existing donor.
            let inserted = sqlx::query(
                r#"
                INSERT INTO persons (family_id, first_name, last_name, email, phone_number)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (first_name, last_name, email) DO NOTHING
                RETURNING id, family_id, first_name, last_name, email, phone_number
            "#,
            )
            .bind(family_id)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.email)
            .bind(&person.phone_number)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert person: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            match inserted {
                Some(row) => {
                    tx.commit()
                        .await
                        .map_err(|e| DbError::TransactionError(e.to_string()))?;
                    info!("Person created successfully");
                    Self::map_row(&row)
                }
                None => {
                    tx.rollback()
                        .await
                        .map_err(|e| DbError::TransactionError(e.to_string()))?;
                    debug!("Person already exists, reusing existing record");
                    self.select_by_identity(&person.first_name, &person.last_name, &person.email)
                        .await?
                        .ok_or_else(|| {
                            DbError::QueryError(
                                "Person insert conflicted but no existing row was found"
                                    .to_string(),
                            )
                        })
                }
            }
        })
    }
}
