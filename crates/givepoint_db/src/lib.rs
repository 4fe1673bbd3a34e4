//! Database integration for Givepoint
//!
//! This crate provides a database client that is designed to be database agnostic,
//! using SQLx as the underlying database library. It supports SQLite, PostgreSQL,
//! and MySQL databases through feature flags, and exposes one explicit repository
//! per entity the donation flow touches: donors (with family groups), funds,
//! contributions, saved payment methods, and bank accounts.
//!
//! Every read and write is an explicit repository call; there is no lazy
//! loading and no implicit unit-of-work.
//!
//! # Example
//!
//! ```rust,no_run
//! use givepoint_config::AppConfig;
//! use givepoint_db::DbClient;
//! use std::sync::Arc;
//!
//! async fn setup_db(config: Arc<AppConfig>) -> Result<DbClient, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::new(&config).await?;
//!     Ok(db_client)
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;

// Re-export the client, factory, and repository traits for ease of use
pub use client::DbClient;
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repository::RepositoryFactory;

// Re-export the repositories module components for ease of use
pub use repositories::{
    hash_account, BankAccount, BankAccountRepository, Contribution, ContributionDetail,
    ContributionRepository, Fund, FundRepository, HomeAddress, NewBankAccount, NewContribution,
    NewContributionDetail, NewPerson, NewSavedAccount, Person, PersonRepository, SavedAccount,
    SavedAccountRepository, SqlBankAccountRepository, SqlContributionRepository,
    SqlFundRepository, SqlPersonRepository, SqlRepositoryFactory, SqlSavedAccountRepository,
};
