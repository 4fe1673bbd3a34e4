// --- File: crates/givepoint_common/src/models_test.rs ---

use crate::models::{mask_account_number, CardBrand};

#[test]
fn masks_all_but_last_four() {
    assert_eq!(
        mask_account_number("4111111111111234"),
        "************1234"
    );
    assert_eq!(mask_account_number("123456789"), "*****6789");
}

#[test]
fn short_inputs_are_left_unchanged() {
    assert_eq!(mask_account_number("1234"), "1234");
    assert_eq!(mask_account_number("123"), "123");
    assert_eq!(mask_account_number(""), "");
}

#[test]
fn masking_five_characters_hides_one() {
    assert_eq!(mask_account_number("12345"), "*2345");
}

#[test]
fn detects_common_card_brands() {
    assert_eq!(CardBrand::detect("4111111111111111"), CardBrand::Visa);
    assert_eq!(CardBrand::detect("5500000000000004"), CardBrand::MasterCard);
    assert_eq!(CardBrand::detect("2221000000000009"), CardBrand::MasterCard);
    assert_eq!(
        CardBrand::detect("340000000000009"),
        CardBrand::AmericanExpress
    );
    assert_eq!(CardBrand::detect("6011000000000004"), CardBrand::Discover);
    assert_eq!(CardBrand::detect("9999000000000001"), CardBrand::Other);
}

#[test]
fn brand_descriptions_are_presentable() {
    assert_eq!(CardBrand::Visa.description(), "Visa");
    assert_eq!(CardBrand::Other.description(), "Card");
}
