//! Repository for saved payment methods
//!
//! A saved account holds the gateway vault reference for a previously used
//! instrument, so a returning donor can charge it again without re-entering
//! the number. Only the masked number is stored locally. A donor has at
//! most one saved account per masked number.

use crate::error::DbError;
use givepoint_common::services::BoxFuture;
use serde::{Deserialize, Serialize};

/// A tokenized payment method on file for a donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAccount {
    pub id: i64,
    pub person_id: i64,
    /// Display name, e.g. "Visa" or "Checking".
    pub name: String,
    /// Account number with all but the last four characters hidden.
    pub masked_number: String,
    /// The gateway's vault reference for the instrument.
    pub reference_number: String,
    /// The charge that produced the token.
    pub transaction_code: String,
    /// The instrument flavor: `credit`, `checking` or `savings`.
    pub currency_kind: String,
}

/// A saved account to persist after tokenization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavedAccount {
    pub person_id: i64,
    pub name: String,
    pub masked_number: String,
    pub reference_number: String,
    pub transaction_code: String,
    pub currency_kind: String,
}

/// Repository for saved payment methods
pub trait SavedAccountRepository: Send + Sync {
    /// Create the `saved_accounts` table if it doesn't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Find a saved account by id.
    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<SavedAccount>, DbError>;

    /// Find a donor's saved account with the given masked number.
    fn find_by_person_and_mask(
        &self,
        person_id: i64,
        masked_number: &str,
    ) -> BoxFuture<'_, Option<SavedAccount>, DbError>;

    /// Persist a saved account.
    fn create(&self, account: NewSavedAccount) -> BoxFuture<'_, SavedAccount, DbError>;
}
