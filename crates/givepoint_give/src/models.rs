// --- File: crates/givepoint_give/src/models.rs ---
use serde::Deserialize;
use std::str::FromStr;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use givepoint_common::services::AchKind;

/// A single line item of a gift, directing part of the total to one fund.
/// Amounts are integer cents.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AmountDetail {
    /// Identifier of the fund this portion of the gift goes to.
    pub target_fund_id: i64,
    /// Amount in the currency's smallest unit (cents).
    pub amount: i64,
}

/// Inbound payload for the give endpoint.
///
/// Every scalar field is optional at the wire level; the validation pass
/// decides which ones are required for the payment method in use.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GiveRequest {
    // --- Donor identity ---
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,

    // --- Billing / home address ---
    #[serde(default)]
    pub street1: Option<String>,
    #[serde(default)]
    pub street2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,

    // --- Fresh payment instrument ---
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub ccv: Option<String>,
    #[serde(default)]
    pub expiration_month: Option<u32>,
    #[serde(default)]
    pub expiration_year: Option<i32>,

    // --- Saved payment instrument ---
    #[serde(default)]
    pub person_id: Option<i64>,
    #[serde(default)]
    pub source_account_id: Option<i64>,

    // --- Gift breakdown ---
    #[serde(default)]
    pub amount_details: Vec<AmountDetail>,
}

impl GiveRequest {
    /// Parses the `account_type` field, if present and recognized.
    pub fn account_kind(&self) -> Option<AccountKind> {
        self.account_type
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }
}

/// The payment instrument categories a fresh gift can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    /// Lowercase wire/database spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
        }
    }

    /// Human-facing spelling, used when naming a saved ACH account.
    pub fn display_name(&self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::Credit => "Credit",
        }
    }

    pub fn is_ach(&self) -> bool {
        matches!(self, AccountKind::Checking | AccountKind::Savings)
    }

    /// Maps ACH kinds to the gateway's bank account types. `None` for credit.
    pub fn ach_kind(&self) -> Option<AchKind> {
        match self {
            AccountKind::Checking => Some(AchKind::Checking),
            AccountKind::Savings => Some(AchKind::Savings),
            AccountKind::Credit => None,
        }
    }
}

impl FromStr for AccountKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "credit" => Ok(AccountKind::Credit),
            _ => Err(()),
        }
    }
}
