//! Repository for giving funds
//!
//! Funds are the targets a donation's line items point at (general fund,
//! missions, building fund, ...). They are administered out of band; the
//! donation flow only reads them.

use crate::error::DbError;
use givepoint_common::services::BoxFuture;
use serde::{Deserialize, Serialize};

/// A fund a donation line item can target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fund {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Repository for funds
pub trait FundRepository: Send + Sync {
    /// Create the `funds` table if it doesn't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Find an active fund by id. Inactive funds behave as missing.
    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Fund>, DbError>;

    /// Create a fund.
    fn create(&self, name: &str) -> BoxFuture<'_, Fund, DbError>;
}
