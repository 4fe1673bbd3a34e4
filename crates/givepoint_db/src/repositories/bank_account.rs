//! Repository for donor bank accounts
//!
//! Bank accounts used for ACH gifts are stored as a one-way hash of the
//! routing and account number pair, alongside the masked account number.
//! The raw numbers are never persisted. The hash dedups per donor: two
//! donors sharing an account each keep their own record.

use crate::error::DbError;
use givepoint_common::services::BoxFuture;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A bank account on file for a donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: i64,
    pub person_id: i64,
    pub masked_number: String,
    pub account_hash: String,
}

/// A bank account to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBankAccount {
    pub person_id: i64,
    pub masked_number: String,
    pub account_hash: String,
}

/// Hex SHA-256 over the routing/account pair. Stable across runs, so the
/// same pair always maps to the same hash.
pub fn hash_account(routing_number: &str, account_number: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(routing_number.as_bytes());
    hasher.update(b"|");
    hasher.update(account_number.as_bytes());
    hex::encode(hasher.finalize())
}

/// Repository for bank account records
pub trait BankAccountRepository: Send + Sync {
    /// Create the `bank_accounts` table if it doesn't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Find a donor's bank account by its account hash.
    fn find_by_person_and_hash(
        &self,
        person_id: i64,
        account_hash: &str,
    ) -> BoxFuture<'_, Option<BankAccount>, DbError>;

    /// Persist a bank account.
    fn create(&self, account: NewBankAccount) -> BoxFuture<'_, BankAccount, DbError>;
}
