//! Factories for the SQL repositories
//!
//! One factory struct covers all five repositories; each implementation of
//! [`RepositoryFactory`] wires a repository to a database client.

use crate::repositories::bank_account_sql::SqlBankAccountRepository;
use crate::repositories::contribution_sql::SqlContributionRepository;
use crate::repositories::fund_sql::SqlFundRepository;
use crate::repositories::person_sql::SqlPersonRepository;
use crate::repositories::saved_account_sql::SqlSavedAccountRepository;
use crate::{DbClient, RepositoryFactory};

/// Factory for creating SQL repository instances
#[derive(Debug, Clone, Default)]
pub struct SqlRepositoryFactory;

impl SqlRepositoryFactory {
    /// Create a new SQL repository factory
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlPersonRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlPersonRepository {
        SqlPersonRepository::new(db_client)
    }
}

impl RepositoryFactory<SqlFundRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlFundRepository {
        SqlFundRepository::new(db_client)
    }
}

impl RepositoryFactory<SqlContributionRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlContributionRepository {
        SqlContributionRepository::new(db_client)
    }
}

impl RepositoryFactory<SqlSavedAccountRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlSavedAccountRepository {
        SqlSavedAccountRepository::new(db_client)
    }
}

impl RepositoryFactory<SqlBankAccountRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlBankAccountRepository {
        SqlBankAccountRepository::new(db_client)
    }
}
