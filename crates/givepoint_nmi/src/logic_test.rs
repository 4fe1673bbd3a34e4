// --- File: crates/givepoint_nmi/src/logic_test.rs ---

use crate::logic::{
    build_charge_payload, build_reference_payload, format_amount, format_expiration,
    parse_response,
};
use givepoint_common::services::{AchKind, BillingAddress, PaymentDetail, PaymentInfo};
use givepoint_config::NmiConfig;

fn test_config() -> NmiConfig {
    NmiConfig {
        api_url: "https://gateway.example/api/transact.php".to_string(),
        currency: Some("USD".to_string()),
        timeout_secs: Some(10),
    }
}

fn card_payment() -> PaymentInfo {
    PaymentInfo {
        amount: 2550,
        first_name: "Ted".to_string(),
        last_name: "Decker".to_string(),
        email: "ted@example.com".to_string(),
        phone_number: "8005551212".to_string(),
        address: Some(BillingAddress {
            street1: "100 Main St".to_string(),
            street2: None,
            city: "Anderson".to_string(),
            state: "SC".to_string(),
            postal_code: "29621".to_string(),
            country: None,
        }),
        detail: PaymentDetail::CreditCard {
            number: "4111111111111111".to_string(),
            ccv: "123".to_string(),
            expiration_month: 4,
            expiration_year: 2031,
        },
    }
}

fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn amounts_format_as_decimal_strings() {
    assert_eq!(format_amount(2550), "25.50");
    assert_eq!(format_amount(100), "1.00");
    assert_eq!(format_amount(105), "1.05");
    assert_eq!(format_amount(100000), "1000.00");
}

#[test]
fn expirations_format_as_mmyy() {
    assert_eq!(format_expiration(4, 2031), "0431");
    assert_eq!(format_expiration(12, 2026), "1226");
    assert_eq!(format_expiration(1, 2100), "0100");
}

#[test]
fn card_payload_carries_sale_and_card_fields() {
    let payload = build_charge_payload("key-123", &test_config(), &card_payment(), "order-1");

    assert_eq!(field(&payload, "security_key"), Some("key-123"));
    assert_eq!(field(&payload, "type"), Some("sale"));
    assert_eq!(field(&payload, "amount"), Some("25.50"));
    assert_eq!(field(&payload, "orderid"), Some("order-1"));
    assert_eq!(field(&payload, "currency"), Some("USD"));
    assert_eq!(field(&payload, "payment"), Some("creditcard"));
    assert_eq!(field(&payload, "ccnumber"), Some("4111111111111111"));
    assert_eq!(field(&payload, "ccexp"), Some("0431"));
    assert_eq!(field(&payload, "cvv"), Some("123"));
    assert_eq!(field(&payload, "address1"), Some("100 Main St"));
    assert_eq!(field(&payload, "state"), Some("SC"));
    assert_eq!(field(&payload, "zip"), Some("29621"));
    assert_eq!(field(&payload, "address2"), None);
}

#[test]
fn ach_payload_carries_check_fields() {
    let mut payment = card_payment();
    payment.detail = PaymentDetail::Ach {
        routing_number: "021000021".to_string(),
        account_number: "123456789".to_string(),
        kind: AchKind::Savings,
    };

    let payload = build_charge_payload("key-123", &test_config(), &payment, "order-2");

    assert_eq!(field(&payload, "payment"), Some("check"));
    assert_eq!(field(&payload, "checkaba"), Some("021000021"));
    assert_eq!(field(&payload, "checkaccount"), Some("123456789"));
    assert_eq!(field(&payload, "checkname"), Some("Ted Decker"));
    assert_eq!(field(&payload, "account_type"), Some("savings"));
    assert_eq!(field(&payload, "ccnumber"), None);
}

#[test]
fn reference_payload_charges_the_vault() {
    let mut payment = card_payment();
    payment.detail = PaymentDetail::Reference {
        reference_number: "vault-42".to_string(),
        masked_number: "************1111".to_string(),
    };

    let payload = build_charge_payload("key-123", &test_config(), &payment, "order-3");

    assert_eq!(field(&payload, "customer_vault_id"), Some("vault-42"));
    assert_eq!(field(&payload, "payment"), None);
    assert_eq!(field(&payload, "ccnumber"), None);
    assert_eq!(field(&payload, "checkaccount"), None);
}

#[test]
fn vault_payload_references_the_settled_sale() {
    let payload = build_reference_payload("key-123", "tx-777");

    assert_eq!(field(&payload, "customer_vault"), Some("add_customer"));
    assert_eq!(field(&payload, "source_transaction_id"), Some("tx-777"));
}

#[test]
fn approved_responses_parse() {
    let parsed = parse_response(
        "response=1&responsetext=SUCCESS&authcode=123456&transactionid=9985&response_code=100",
    )
    .unwrap();

    assert!(parsed.approved());
    assert_eq!(parsed.transactionid, "9985");
    assert_eq!(parsed.authcode, "123456");
}

#[test]
fn declined_responses_parse_with_message() {
    let parsed =
        parse_response("response=2&responsetext=DECLINE&transactionid=9986&response_code=200")
            .unwrap();

    assert!(!parsed.approved());
    assert!(parsed.declined());
    assert_eq!(parsed.responsetext, "DECLINE");
}

#[test]
fn vault_responses_carry_the_reference() {
    let parsed =
        parse_response("response=1&responsetext=Customer+Added&customer_vault_id=168580&response_code=100")
            .unwrap();

    assert!(parsed.approved());
    assert_eq!(parsed.customer_vault_id, "168580");
}

#[test]
fn missing_fields_default_to_empty() {
    let parsed = parse_response("response=3").unwrap();
    assert!(!parsed.approved());
    assert!(parsed.responsetext.is_empty());
    assert!(parsed.transactionid.is_empty());
}
