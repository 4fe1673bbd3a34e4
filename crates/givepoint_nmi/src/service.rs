// --- File: crates/givepoint_nmi/src/service.rs ---

use givepoint_common::http::client::{create_client, HTTP_CLIENT};
use givepoint_common::services::{
    BoxFuture, ChargeOutcome, GatewayError, PaymentGateway, PaymentInfo,
};
use givepoint_config::{AppConfig, NmiConfig};
use reqwest::Client;
use std::sync::Arc;

use crate::error::NmiError;
use crate::logic;

/// NMI payment gateway implementation
pub struct NmiPaymentGateway {
    config: Arc<AppConfig>,
    client: Client,
}

impl NmiPaymentGateway {
    /// Create a new NMI payment gateway.
    ///
    /// The HTTP client carries the configured timeout; a request exceeding
    /// it surfaces as `GatewayError::Timeout`.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, NmiError> {
        let nmi = config.nmi.as_ref().ok_or(NmiError::ConfigError)?;

        let client = match nmi.timeout_secs {
            Some(secs) => create_client(secs, true)?,
            None => HTTP_CLIENT.clone(),
        };

        Ok(Self { config, client })
    }

    fn nmi_config(&self) -> Result<&NmiConfig, NmiError> {
        self.config.nmi.as_ref().ok_or(NmiError::ConfigError)
    }
}

impl PaymentGateway for NmiPaymentGateway {
    fn charge(&self, payment: PaymentInfo) -> BoxFuture<'_, ChargeOutcome, GatewayError> {
        Box::pin(async move {
            let nmi = self.nmi_config().map_err(GatewayError::from)?;
            logic::charge(nmi, &self.client, &payment)
                .await
                .map_err(GatewayError::from)
        })
    }

    fn reference_number(&self, transaction_code: &str) -> BoxFuture<'_, String, GatewayError> {
        // Clone the values to avoid lifetime issues
        let transaction_code = transaction_code.to_string();
        Box::pin(async move {
            let nmi = self.nmi_config().map_err(GatewayError::from)?;
            logic::reference_number(nmi, &self.client, &transaction_code)
                .await
                .map_err(GatewayError::from)
        })
    }
}
