//! Repository for recorded contributions
//!
//! A contribution is the persisted record of one settled gateway charge:
//! a header row carrying the gateway transaction code and the total, plus
//! one detail row per line item. The detail amounts always sum to the
//! header total; `record` persists both in a single transaction.

use crate::error::DbError;
use givepoint_common::services::BoxFuture;
use serde::{Deserialize, Serialize};

/// A persisted contribution header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: i64,
    pub person_id: i64,
    /// The gateway's transaction identifier.
    pub transaction_code: String,
    /// The instrument flavor: `credit`, `checking` or `savings`.
    pub currency_kind: String,
    /// Total charged, in minor units (cents).
    pub total_amount: i64,
}

/// A persisted line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionDetail {
    pub id: i64,
    pub contribution_id: i64,
    pub fund_id: i64,
    pub amount: i64,
}

/// A line item to record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContributionDetail {
    pub fund_id: i64,
    pub amount: i64,
}

/// A contribution to record after a successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContribution {
    pub person_id: i64,
    pub transaction_code: String,
    pub currency_kind: String,
    pub total_amount: i64,
    pub details: Vec<NewContributionDetail>,
}

/// Repository for contribution records
pub trait ContributionRepository: Send + Sync {
    /// Create the `contributions` and `contribution_details` tables if they
    /// don't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Persist a contribution header and its line items atomically.
    fn record(&self, contribution: NewContribution) -> BoxFuture<'_, Contribution, DbError>;

    /// Load the line items of a contribution.
    fn details_for(
        &self,
        contribution_id: i64,
    ) -> BoxFuture<'_, Vec<ContributionDetail>, DbError>;
}
