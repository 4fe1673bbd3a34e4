//! Repository modules for database access
//!
//! One module pair per entity: the trait and its models, and the SQL
//! implementation. [`factory`] wires the SQL implementations to a client.

pub mod bank_account;
pub mod bank_account_sql;
pub mod contribution;
pub mod contribution_sql;
pub mod factory;
pub mod fund;
pub mod fund_sql;
pub mod person;
pub mod person_sql;
pub mod saved_account;
pub mod saved_account_sql;

#[cfg(test)]
mod bank_account_test;

// Re-export the repository traits and models for ease of use
pub use bank_account::{hash_account, BankAccount, BankAccountRepository, NewBankAccount};
pub use bank_account_sql::SqlBankAccountRepository;
pub use contribution::{
    Contribution, ContributionDetail, ContributionRepository, NewContribution,
    NewContributionDetail,
};
pub use contribution_sql::SqlContributionRepository;
pub use factory::SqlRepositoryFactory;
pub use fund::{Fund, FundRepository};
pub use fund_sql::SqlFundRepository;
pub use person::{HomeAddress, NewPerson, Person, PersonRepository};
pub use person_sql::SqlPersonRepository;
pub use saved_account::{NewSavedAccount, SavedAccount, SavedAccountRepository};
pub use saved_account_sql::SqlSavedAccountRepository;
