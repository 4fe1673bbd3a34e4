//! Feature flag handling for the Givepoint application.
//!
//! Feature flags are used in two ways:
//!
//! 1. Compile-time feature flags using `#[cfg(feature = "...")]`
//! 2. Runtime feature flags using configuration values
//!
//! This module provides helper functions for checking if features are enabled
//! at runtime based on configuration values.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation
//! - `nmi`: Enables the NMI payment gateway
//! - `give`: Enables the donation endpoint

use givepoint_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// A feature counts as enabled when its flag is set and its configuration
/// section is present.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the NMI gateway feature is enabled at runtime.
#[cfg(feature = "nmi")]
pub fn is_nmi_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_nmi, config.nmi.as_ref())
}

/// Check if the donation endpoint is enabled at runtime.
#[cfg(feature = "give")]
pub fn is_give_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_give, config.giving.as_ref())
}
