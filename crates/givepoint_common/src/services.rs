// --- File: crates/givepoint_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module defines the payment-gateway capability used by the donation
//! flow. The trait is object-safe so the application can hold a
//! `Arc<dyn PaymentGateway>` built by the service factory, and tests can
//! substitute a mock.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors a payment gateway can surface to the donation flow.
///
/// `Declined` and `Api` carry the gateway's own message so it can be passed
/// through to the client verbatim. `Timeout` is kept distinct so a bounded
/// wait maps to 504 rather than a generic gateway failure.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway did not answer within the configured bound.
    #[error("Gateway timed out: {0}")]
    Timeout(String),

    /// The gateway answered and refused the charge.
    #[error("{message}")]
    Declined { message: String },

    /// The gateway answered with an error outside the charge itself.
    #[error("{message}")]
    Api { message: String },

    /// The gateway is not configured correctly (e.g. missing security key).
    #[error("Gateway configuration error: {0}")]
    Config(String),

    /// The request never produced a usable gateway response.
    #[error("Gateway request failed: {0}")]
    Request(String),
}

/// Bank account flavors accepted for ACH charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchKind {
    Checking,
    Savings,
}

impl AchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchKind::Checking => "checking",
            AchKind::Savings => "savings",
        }
    }
}

/// The instrument a charge draws on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentDetail {
    /// A card presented in full.
    CreditCard {
        number: String,
        ccv: String,
        expiration_month: u32,
        expiration_year: i32,
    },
    /// A bank account presented in full.
    Ach {
        routing_number: String,
        account_number: String,
        kind: AchKind,
    },
    /// A previously tokenized instrument held in the gateway's vault.
    Reference {
        reference_number: String,
        masked_number: String,
    },
}

/// Billing address attached to a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
}

/// Everything the gateway needs for a single charge attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Total amount in minor units (cents).
    pub amount: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<BillingAddress>,
    pub detail: PaymentDetail,
}

/// Result of a successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeOutcome {
    /// The gateway's transaction identifier.
    pub transaction_code: String,
    /// Processor authorization code, when the gateway reports one.
    pub authorization_code: Option<String>,
}

/// A trait for payment gateway operations.
///
/// A charge is a single attempt; retrying is the caller's decision, and no
/// implementation may retry internally.
pub trait PaymentGateway: Send + Sync {
    /// Charge the given payment instrument. One attempt, no retry.
    fn charge(&self, payment: PaymentInfo) -> BoxFuture<'_, ChargeOutcome, GatewayError>;

    /// Tokenize the instrument behind a settled transaction for later reuse.
    fn reference_number(&self, transaction_code: &str) -> BoxFuture<'_, String, GatewayError>;
}

/// A factory for creating service instances.
///
/// The backend implements this against its typed configuration; a feature
/// that is disabled or unconfigured yields `None`.
pub trait ServiceFactory: Send + Sync {
    /// Get a payment gateway instance.
    fn payment_gateway(&self) -> Option<Arc<dyn PaymentGateway>>;
}
