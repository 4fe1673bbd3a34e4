// --- File: crates/givepoint_common/src/models.rs ---

// Shared payment-instrument helpers used by the gateway crate and the
// donation flow: account-number masking and card-brand detection.

/// Masks an account number, keeping only the last four characters.
///
/// Inputs of four characters or fewer are returned unchanged.
pub fn mask_account_number(unmasked: &str) -> String {
    let len = unmasked.chars().count();
    if len <= 4 {
        return unmasked.to_string();
    }
    let visible: String = unmasked.chars().skip(len - 4).collect();
    format!("{}{}", "*".repeat(len - 4), visible)
}

/// Card brands recognized from the account-number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBrand {
    Visa,
    MasterCard,
    AmericanExpress,
    Discover,
    Other,
}

impl CardBrand {
    /// Detects the brand from the leading digits of a card number.
    pub fn detect(number: &str) -> CardBrand {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.starts_with('4') {
            CardBrand::Visa
        } else if digits.starts_with("34") || digits.starts_with("37") {
            CardBrand::AmericanExpress
        } else if digits.starts_with("6011") || digits.starts_with("65") {
            CardBrand::Discover
        } else if matches!(
            digits.get(..2),
            Some("51" | "52" | "53" | "54" | "55" | "22" | "23" | "24" | "25" | "26" | "27")
        ) {
            CardBrand::MasterCard
        } else {
            CardBrand::Other
        }
    }

    /// Human-readable brand name, used when naming a saved payment method.
    pub fn description(&self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::MasterCard => "MasterCard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Discover => "Discover",
            CardBrand::Other => "Card",
        }
    }
}
