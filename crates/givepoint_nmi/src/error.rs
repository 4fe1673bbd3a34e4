// --- File: crates/givepoint_nmi/src/error.rs ---
use givepoint_common::services::GatewayError;
use thiserror::Error;

/// NMI-specific error types.
#[derive(Error, Debug)]
pub enum NmiError {
    /// Error occurred during an NMI API request
    #[error("NMI API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The gateway answered outside the Direct Post protocol
    #[error("NMI API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The gateway processed the request and declined the charge
    #[error("{message}")]
    Declined { message: String },

    /// Error parsing the Direct Post response body
    #[error("Failed to parse NMI API response: {0}")]
    ParseError(String),

    /// Missing or incomplete NMI configuration (including the security key)
    #[error("NMI configuration missing or incomplete")]
    ConfigError,

    /// The vault request succeeded but carried no customer vault id
    #[error("NMI vault response carried no customer vault id")]
    MissingReference,
}

/// Convert NmiError to the gateway error the donation flow consumes.
///
/// A reqwest timeout becomes `GatewayError::Timeout` so the bounded wait is
/// distinguishable from an ordinary gateway failure.
impl From<NmiError> for GatewayError {
    fn from(err: NmiError) -> Self {
        match err {
            NmiError::RequestError(e) if e.is_timeout() => GatewayError::Timeout(e.to_string()),
            NmiError::RequestError(e) => GatewayError::Request(e.to_string()),
            NmiError::ApiError { message, .. } => GatewayError::Api { message },
            NmiError::Declined { message } => GatewayError::Declined { message },
            NmiError::ParseError(message) => GatewayError::Request(message),
            NmiError::ConfigError => {
                GatewayError::Config("NMI configuration missing or incomplete".to_string())
            }
            NmiError::MissingReference => GatewayError::Api {
                message: "NMI vault response carried no customer vault id".to_string(),
            },
        }
    }
}
