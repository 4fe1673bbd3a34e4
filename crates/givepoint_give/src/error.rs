// --- File: crates/givepoint_give/src/error.rs ---
use thiserror::Error;

use givepoint_common::services::GatewayError;
use givepoint_common::HttpStatusCode;
use givepoint_db::DbError;

/// Message returned when the gateway fails without a usable message of its own.
pub const GATEWAY_FALLBACK_MESSAGE: &str =
    "The gateway had a problem and/or did not create a transaction as expected";

/// Everything that can make a give request invalid before the gateway is
/// touched. Checks run in declaration order and the first failure wins, so
/// a caller fixing errors one at a time walks this list top to bottom.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("phone_number is required")]
    MissingPhone,
    #[error("email is required")]
    MissingEmail,
    #[error("first_name and last_name are required")]
    MissingName,
    #[error("street1, city, state, and postal_code are required")]
    MissingAddress,
    #[error("state must be a 2 letter string")]
    InvalidState,
    #[error("a payment source is required: either a source_account_id with a person_id, or an account_number")]
    MissingAccountReference,
    #[error("account_type is required and must be one of checking, savings, or credit")]
    MissingAccountType,
    #[error("routing_number is required for ACH transactions")]
    MissingRoutingNumber,
    #[error("ccv is required for credit transactions")]
    MissingCcv,
    #[error("expiration_month is required and must be between 1 and 12")]
    InvalidExpirationMonth,
    #[error("expiration_year is required and must be between {min} and {max}")]
    InvalidExpirationYear { min: i32, max: i32 },
    #[error("the card expiration date must not have already elapsed")]
    ExpiredCard,
    #[error("amount_details are required")]
    MissingLineItems,
    #[error("every amount detail must carry an amount of at least {minimum}")]
    InvalidLineItemAmount { minimum: i64 },
    #[error("amount detail target_fund_id {fund_id} does not match an active fund")]
    UnknownTargetAccount { fund_id: i64 },
}

/// Errors surfaced by the give flow as a whole.
#[derive(Error, Debug)]
pub enum GiveError {
    #[error("{0}")]
    Validation(#[from] ValidationFailure),
    #[error("person_id {0} did not resolve to an existing person")]
    UnknownPerson(i64),
    /// The gateway rejected or botched the charge. The message is what the
    /// client sees, verbatim.
    #[error("{message}")]
    Gateway { message: String },
    /// The gateway did not answer within its deadline. The payload keeps the
    /// transport detail for the logs; the client only sees the status.
    #[error("The gateway did not respond within the allotted time")]
    Timeout(String),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for GiveError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout(detail) => GiveError::Timeout(detail),
            GatewayError::Declined { message } | GatewayError::Api { message } => {
                let trimmed = message.trim();
                if trimmed.is_empty() {
                    GiveError::Gateway {
                        message: GATEWAY_FALLBACK_MESSAGE.to_string(),
                    }
                } else {
                    GiveError::Gateway {
                        message: trimmed.to_string(),
                    }
                }
            }
            // Transport and wiring problems are not the donor's fault and
            // carry nothing worth relaying; fall back to the stock message.
            GatewayError::Request(_) => GiveError::Gateway {
                message: GATEWAY_FALLBACK_MESSAGE.to_string(),
            },
            GatewayError::Config(detail) => GiveError::Internal(detail),
        }
    }
}

impl HttpStatusCode for GiveError {
    fn status_code(&self) -> u16 {
        match self {
            GiveError::Validation(_) | GiveError::UnknownPerson(_) => 400,
            GiveError::Gateway { .. } => 500,
            GiveError::Timeout(_) => 504,
            GiveError::Db(_) | GiveError::Internal(_) => 500,
        }
    }
}
