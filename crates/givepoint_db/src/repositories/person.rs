//! Repository for donors and their family groups
//!
//! A donor always belongs to a family group. Creating a first-time donor
//! creates the family row in the same transaction, so a donor record never
//! exists without its family.

use crate::error::DbError;
use givepoint_common::services::BoxFuture;
use serde::{Deserialize, Serialize};

/// A donor record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub family_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Home address stored on the family group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeAddress {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
}

/// A donor to be created, together with the family group details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<HomeAddress>,
}

impl NewPerson {
    /// Name of the family group created alongside a first-time donor.
    pub fn family_name(&self) -> String {
        format!("{} Family", self.last_name)
    }
}

/// Repository for donor records
pub trait PersonRepository: Send + Sync {
    /// Create the `families` and `persons` tables if they don't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Find a donor by id.
    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Person>, DbError>;

    /// Find a donor by the exact (first name, last name, email) triple.
    fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> BoxFuture<'_, Option<Person>, DbError>;

    /// Create a donor and their family group in one transaction.
    ///
    /// The identity triple is unique; when two identical requests race, the
    /// second insert is a no-op and both callers get the same row back.
    fn create_with_family(&self, person: NewPerson) -> BoxFuture<'_, Person, DbError>;
}
