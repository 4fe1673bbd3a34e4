// --- File: crates/givepoint_nmi/src/logic.rs ---

use givepoint_common::services::{ChargeOutcome, PaymentDetail, PaymentInfo};
use givepoint_config::NmiConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::NmiError;

/// Environment variable carrying the Direct Post security key.
pub const SECURITY_KEY_ENV: &str = "NMI_SECURITY_KEY";

fn security_key() -> Result<String, NmiError> {
    std::env::var(SECURITY_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(NmiError::ConfigError)
}

/// Formats minor units as the decimal string the Direct Post API expects.
pub fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Formats a card expiration as MMYY.
pub fn format_expiration(month: u32, year: i32) -> String {
    format!("{:02}{:02}", month, year.rem_euclid(100))
}

/// Builds the form pairs for a `type=sale` Direct Post request.
pub fn build_charge_payload(
    security_key: &str,
    config: &NmiConfig,
    payment: &PaymentInfo,
    order_id: &str,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = vec![
        ("security_key".into(), security_key.to_string()),
        ("type".into(), "sale".into()),
        ("amount".into(), format_amount(payment.amount)),
        ("orderid".into(), order_id.to_string()),
        ("first_name".into(), payment.first_name.clone()),
        ("last_name".into(), payment.last_name.clone()),
        ("email".into(), payment.email.clone()),
        ("phone".into(), payment.phone_number.clone()),
    ];

    if let Some(currency) = &config.currency {
        pairs.push(("currency".into(), currency.clone()));
    }

    if let Some(address) = &payment.address {
        pairs.push(("address1".into(), address.street1.clone()));
        if let Some(street2) = &address.street2 {
            pairs.push(("address2".into(), street2.clone()));
        }
        pairs.push(("city".into(), address.city.clone()));
        pairs.push(("state".into(), address.state.clone()));
        pairs.push(("zip".into(), address.postal_code.clone()));
        if let Some(country) = &address.country {
            pairs.push(("country".into(), country.clone()));
        }
    }

    match &payment.detail {
        PaymentDetail::CreditCard {
            number,
            ccv,
            expiration_month,
            expiration_year,
        } => {
            pairs.push(("payment".into(), "creditcard".into()));
            pairs.push(("ccnumber".into(), number.clone()));
            pairs.push((
                "ccexp".into(),
                format_expiration(*expiration_month, *expiration_year),
            ));
            pairs.push(("cvv".into(), ccv.clone()));
        }
        PaymentDetail::Ach {
            routing_number,
            account_number,
            kind,
        } => {
            pairs.push(("payment".into(), "check".into()));
            pairs.push(("checkaba".into(), routing_number.clone()));
            pairs.push(("checkaccount".into(), account_number.clone()));
            pairs.push((
                "checkname".into(),
                format!("{} {}", payment.first_name, payment.last_name),
            ));
            pairs.push(("account_holder_type".into(), "personal".into()));
            pairs.push(("account_type".into(), kind.as_str().into()));
        }
        PaymentDetail::Reference {
            reference_number, ..
        } => {
            pairs.push(("customer_vault_id".into(), reference_number.clone()));
        }
    }

    pairs
}

/// Builds the form pairs for vaulting the instrument behind a settled sale.
pub fn build_reference_payload(
    security_key: &str,
    transaction_code: &str,
) -> Vec<(String, String)> {
    vec![
        ("security_key".into(), security_key.to_string()),
        ("customer_vault".into(), "add_customer".into()),
        ("source_transaction_id".into(), transaction_code.to_string()),
    ]
}

// --- Direct Post Response ---

/// A parsed Direct Post response. `response` is "1" approved, "2" declined,
/// "3" error.
#[derive(Deserialize, Debug, Default)]
pub struct DirectPostResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub responsetext: String,
    #[serde(default)]
    pub authcode: String,
    #[serde(default)]
    pub transactionid: String,
    #[serde(default)]
    pub response_code: String,
    #[serde(default)]
    pub customer_vault_id: String,
}

impl DirectPostResponse {
    pub fn approved(&self) -> bool {
        self.response == "1"
    }

    pub fn declined(&self) -> bool {
        self.response == "2"
    }
}

/// Parses a form-urlencoded Direct Post response body.
pub fn parse_response(body: &str) -> Result<DirectPostResponse, NmiError> {
    serde_urlencoded::from_str(body).map_err(|e| NmiError::ParseError(e.to_string()))
}

async fn submit(
    client: &Client,
    api_url: &str,
    payload: &[(String, String)],
) -> Result<DirectPostResponse, NmiError> {
    let response = client.post(api_url).form(payload).send().await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "NMI request failed at HTTP level");
        return Err(NmiError::ApiError {
            status_code: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    parse_response(&body)
}

/// Submits a single sale. One attempt, no retry.
pub async fn charge(
    config: &NmiConfig,
    client: &Client,
    payment: &PaymentInfo,
) -> Result<ChargeOutcome, NmiError> {
    let key = security_key()?;
    let order_id = Uuid::new_v4().to_string();
    let payload = build_charge_payload(&key, config, payment, &order_id);

    debug!(order_id = %order_id, amount = payment.amount, "submitting sale to NMI");

    let parsed = submit(client, &config.api_url, &payload).await?;

    if parsed.approved() {
        debug!(transaction_id = %parsed.transactionid, "NMI sale approved");
        Ok(ChargeOutcome {
            transaction_code: parsed.transactionid,
            authorization_code: if parsed.authcode.is_empty() {
                None
            } else {
                Some(parsed.authcode)
            },
        })
    } else if parsed.declined() {
        debug!(code = %parsed.response_code, "NMI sale declined");
        Err(NmiError::Declined {
            message: parsed.responsetext,
        })
    } else {
        warn!(code = %parsed.response_code, "NMI sale errored");
        Err(NmiError::ApiError {
            status_code: 200,
            message: parsed.responsetext,
        })
    }
}

/// Vaults the instrument behind a settled sale and returns the vault id.
pub async fn reference_number(
    config: &NmiConfig,
    client: &Client,
    transaction_code: &str,
) -> Result<String, NmiError> {
    let key = security_key()?;
    let payload = build_reference_payload(&key, transaction_code);

    debug!(transaction_code = %transaction_code, "requesting NMI vault reference");

    let parsed = submit(client, &config.api_url, &payload).await?;

    if !parsed.approved() {
        return Err(NmiError::ApiError {
            status_code: 200,
            message: parsed.responsetext,
        });
    }
    if parsed.customer_vault_id.is_empty() {
        return Err(NmiError::MissingReference);
    }
    Ok(parsed.customer_vault_id)
}
