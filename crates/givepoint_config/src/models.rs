// --- File: crates/givepoint_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., sqlite://givepoint.db, overridable via GIVEPOINT_DATABASE__URL
}

// --- NMI Gateway Config ---
// Holds non-secret gateway config. The security key is loaded directly
// from the NMI_SECURITY_KEY env var.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NmiConfig {
    pub api_url: String, // Mandatory
    pub currency: Option<String>,
    /// Upper bound on a single gateway round trip, in seconds.
    pub timeout_secs: Option<u64>,
}

// --- Giving Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GivingConfig {
    /// Smallest amount a single line item may carry, in minor units (cents).
    #[serde(default = "default_minimum_unit_amount")]
    pub minimum_unit_amount: i64,
    /// How many years past the current one a card expiration year may lie.
    #[serde(default = "default_card_expiry_horizon_years")]
    pub card_expiry_horizon_years: i32,
}

fn default_minimum_unit_amount() -> i64 {
    100
}

fn default_card_expiry_horizon_years() -> i32 {
    30
}

impl Default for GivingConfig {
    fn default() -> Self {
        GivingConfig {
            minimum_unit_amount: default_minimum_unit_amount(),
            card_expiry_horizon_years: default_card_expiry_horizon_years(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_nmi: bool,
    #[serde(default)]
    pub use_give: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub nmi: Option<NmiConfig>,
    #[serde(default)]
    pub giving: Option<GivingConfig>,
}

impl AppConfig {
    /// Rejects flag/section combinations that could only fail later at
    /// first use. Called by `load_config` so a bad deployment dies at
    /// startup with a readable message.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.use_give {
            if self.database.is_none() {
                return Err(config::ConfigError::Message(
                    "use_give requires a [database] section".into(),
                ));
            }
            if self.giving.is_none() {
                return Err(config::ConfigError::Message(
                    "use_give requires a [giving] section".into(),
                ));
            }
            if !self.use_nmi {
                return Err(config::ConfigError::Message(
                    "use_give requires use_nmi (no other gateway is wired)".into(),
                ));
            }
        }
        if self.use_nmi && self.nmi.is_none() {
            return Err(config::ConfigError::Message(
                "use_nmi requires an [nmi] section".into(),
            ));
        }
        if let Some(giving) = &self.giving {
            if giving.minimum_unit_amount < 1 {
                return Err(config::ConfigError::Message(
                    "giving.minimum_unit_amount must be at least 1".into(),
                ));
            }
            if giving.card_expiry_horizon_years < 0 {
                return Err(config::ConfigError::Message(
                    "giving.card_expiry_horizon_years must not be negative".into(),
                ));
            }
        }
        Ok(())
    }
}
