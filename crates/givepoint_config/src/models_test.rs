// --- File: crates/givepoint_config/src/models_test.rs ---

use crate::models::*;

fn base_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        use_nmi: false,
        use_give: false,
        database: None,
        nmi: None,
        giving: None,
    }
}

#[test]
fn giving_defaults_fill_in_when_section_is_empty() {
    let giving: GivingConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(giving.minimum_unit_amount, 100);
    assert_eq!(giving.card_expiry_horizon_years, 30);
}

#[test]
fn flags_default_to_false() {
    let config: AppConfig =
        serde_json::from_str(r#"{"server":{"host":"0.0.0.0","port":3000}}"#).unwrap();
    assert!(!config.use_give);
    assert!(!config.use_nmi);
    assert!(config.validate().is_ok());
}

#[test]
fn use_give_without_database_is_rejected() {
    let mut config = base_config();
    config.use_give = true;
    config.use_nmi = true;
    config.nmi = Some(NmiConfig {
        api_url: "https://gateway.example/api/transact.php".to_string(),
        currency: None,
        timeout_secs: None,
    });
    config.giving = Some(GivingConfig::default());
    assert!(config.validate().is_err());

    config.database = Some(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
    });
    assert!(config.validate().is_ok());
}

#[test]
fn use_nmi_without_section_is_rejected() {
    let mut config = base_config();
    config.use_nmi = true;
    assert!(config.validate().is_err());
}

#[test]
fn zero_minimum_unit_amount_is_rejected() {
    let mut config = base_config();
    config.giving = Some(GivingConfig {
        minimum_unit_amount: 0,
        ..GivingConfig::default()
    });
    assert!(config.validate().is_err());
}
