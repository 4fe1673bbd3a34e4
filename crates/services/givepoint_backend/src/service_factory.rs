// --- File: crates/services/givepoint_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Initializes external services once at startup, driven by the runtime
//! flags in the configuration, and hands them out as trait objects.

use std::sync::Arc;

use givepoint_common::services::{PaymentGateway, ServiceFactory};
use givepoint_config::AppConfig;
#[allow(unused_imports)]
use tracing::{error, info, warn};

#[cfg(feature = "nmi")]
use givepoint_common::is_nmi_enabled;
#[cfg(feature = "nmi")]
use givepoint_nmi::NmiPaymentGateway;

/// Service factory for the backend.
///
/// Services are created based on configuration and feature flags and exposed
/// through the [`ServiceFactory`] trait, so route wiring never touches a
/// concrete gateway type.
pub struct GivepointServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "nmi")]
    payment_gateway: Option<Arc<dyn PaymentGateway>>,
}

impl GivepointServiceFactory {
    /// Create a new service factory.
    pub fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            config: config.clone(),
            #[cfg(feature = "nmi")]
            payment_gateway: None,
        };

        #[cfg(feature = "nmi")]
        {
            if is_nmi_enabled(&config) {
                info!("Initializing NMI payment gateway...");
                match NmiPaymentGateway::new(config.clone()) {
                    Ok(gateway) => {
                        factory.payment_gateway = Some(Arc::new(gateway));
                    }
                    Err(err) => {
                        error!(error = %err, "Failed to initialize NMI payment gateway");
                    }
                }
            } else {
                info!("NMI payment gateway is disabled in configuration");
            }
        }

        factory
    }
}

impl ServiceFactory for GivepointServiceFactory {
    fn payment_gateway(&self) -> Option<Arc<dyn PaymentGateway>> {
        #[cfg(feature = "nmi")]
        {
            self.payment_gateway.clone()
        }
        #[cfg(not(feature = "nmi"))]
        {
            None
        }
    }
}
