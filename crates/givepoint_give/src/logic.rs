// --- File: crates/givepoint_give/src/logic.rs ---
//! Core donation flow: validation, donor resolution, the single gateway
//! charge, and post-charge bookkeeping.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info, warn};

use givepoint_common::models::{mask_account_number, CardBrand};
use givepoint_common::services::{
    BillingAddress, ChargeOutcome, PaymentDetail, PaymentGateway, PaymentInfo,
};
use givepoint_config::{AppConfig, GivingConfig};
use givepoint_db::{
    hash_account, BankAccountRepository, ContributionRepository, FundRepository, HomeAddress,
    NewBankAccount, NewContribution, NewContributionDetail, NewPerson, NewSavedAccount, Person,
    PersonRepository, SavedAccount, SavedAccountRepository,
};

use crate::error::{GiveError, ValidationFailure};
use crate::models::{AccountKind, GiveRequest};

// --- Context ---

/// Everything the give flow needs, resolved once at startup.
#[derive(Clone)]
pub struct GiveContext {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub persons: Arc<dyn PersonRepository>,
    pub funds: Arc<dyn FundRepository>,
    pub contributions: Arc<dyn ContributionRepository>,
    pub saved_accounts: Arc<dyn SavedAccountRepository>,
    pub bank_accounts: Arc<dyn BankAccountRepository>,
}

impl GiveContext {
    fn giving(&self) -> GivingConfig {
        self.config.giving.clone().unwrap_or_default()
    }
}

// --- Validation ---

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

fn required(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or("").to_string()
}

/// Runs the full field validation pass and returns the gift total in cents.
///
/// Checks run in a fixed order and the first failure wins. Requests paying
/// with a saved account skip the fresh-instrument checks entirely; those
/// fields are ignored when `source_account_id` is present.
pub fn validate(
    request: &GiveRequest,
    giving: &GivingConfig,
    today: NaiveDate,
) -> Result<i64, ValidationFailure> {
    if blank(&request.phone_number) {
        return Err(ValidationFailure::MissingPhone);
    }
    if blank(&request.email) {
        return Err(ValidationFailure::MissingEmail);
    }
    if blank(&request.first_name) || blank(&request.last_name) {
        return Err(ValidationFailure::MissingName);
    }
    if blank(&request.street1)
        || blank(&request.city)
        || blank(&request.state)
        || blank(&request.postal_code)
    {
        return Err(ValidationFailure::MissingAddress);
    }
    if required(&request.state).chars().count() != 2 {
        return Err(ValidationFailure::InvalidState);
    }

    if request.source_account_id.is_some() {
        // Saved-account gifts need a donor to check ownership against.
        if request.person_id.is_none() {
            return Err(ValidationFailure::MissingAccountReference);
        }
    } else {
        validate_fresh_instrument(request, giving, today)?;
    }

    if request.amount_details.is_empty() {
        return Err(ValidationFailure::MissingLineItems);
    }
    let mut total: i64 = 0;
    for detail in &request.amount_details {
        if detail.amount < giving.minimum_unit_amount {
            return Err(ValidationFailure::InvalidLineItemAmount {
                minimum: giving.minimum_unit_amount,
            });
        }
        // Amounts come straight off the wire; an overflowing sum is rejected
        // rather than wrapped into a bogus total.
        total = total.checked_add(detail.amount).ok_or(
            ValidationFailure::InvalidLineItemAmount {
                minimum: giving.minimum_unit_amount,
            },
        )?;
    }
    Ok(total)
}

fn validate_fresh_instrument(
    request: &GiveRequest,
    giving: &GivingConfig,
    today: NaiveDate,
) -> Result<(), ValidationFailure> {
    if blank(&request.account_number) {
        return Err(ValidationFailure::MissingAccountReference);
    }
    let kind = request
        .account_kind()
        .ok_or(ValidationFailure::MissingAccountType)?;
    if kind.is_ach() {
        if blank(&request.routing_number) {
            return Err(ValidationFailure::MissingRoutingNumber);
        }
        return Ok(());
    }

    // Credit card: CCV plus a non-elapsed expiration date.
    if blank(&request.ccv) {
        return Err(ValidationFailure::MissingCcv);
    }
    let month = request
        .expiration_month
        .filter(|m| (1..=12).contains(m))
        .ok_or(ValidationFailure::InvalidExpirationMonth)?;
    let min = today.year();
    let max = min + giving.card_expiry_horizon_years;
    let year = request
        .expiration_year
        .filter(|y| (min..=max).contains(y))
        .ok_or(ValidationFailure::InvalidExpirationYear { min, max })?;
    // A card expires at the end of its stated month.
    if year == today.year() && month < today.month() {
        return Err(ValidationFailure::ExpiredCard);
    }
    Ok(())
}

// --- Payment preparation ---

/// Per-request facts about a freshly supplied instrument, kept around so the
/// post-charge pass can tokenize and persist it.
struct FreshInstrument {
    masked_number: String,
    display_name: String,
    /// `(routing_number, account_number)` for ACH, `None` for cards.
    ach: Option<(String, String)>,
}

struct PreparedPayment {
    info: PaymentInfo,
    /// Stored on the contribution: "credit", "checking", or "savings".
    currency_kind: String,
    /// `None` when paying with an already saved account.
    fresh: Option<FreshInstrument>,
}

fn billing_address(request: &GiveRequest) -> BillingAddress {
    BillingAddress {
        street1: required(&request.street1),
        street2: request.street2.clone().filter(|s| !s.trim().is_empty()),
        city: required(&request.city),
        state: required(&request.state),
        postal_code: required(&request.postal_code),
        country: request.country.clone().filter(|c| !c.trim().is_empty()),
    }
}

fn prepare_payment(
    request: &GiveRequest,
    saved: Option<&SavedAccount>,
    total: i64,
) -> Result<PreparedPayment, GiveError> {
    let (detail, currency_kind, fresh) = if let Some(account) = saved {
        (
            PaymentDetail::Reference {
                reference_number: account.reference_number.clone(),
                masked_number: account.masked_number.clone(),
            },
            account.currency_kind.clone(),
            None,
        )
    } else {
        let kind = request
            .account_kind()
            .ok_or(ValidationFailure::MissingAccountType)?;
        let account_number = required(&request.account_number);
        let masked_number = mask_account_number(&account_number);
        match kind {
            AccountKind::Credit => (
                PaymentDetail::CreditCard {
                    number: account_number.clone(),
                    ccv: required(&request.ccv),
                    expiration_month: request.expiration_month.unwrap_or_default(),
                    expiration_year: request.expiration_year.unwrap_or_default(),
                },
                kind.as_str().to_string(),
                Some(FreshInstrument {
                    display_name: CardBrand::detect(&account_number).description().to_string(),
                    masked_number,
                    ach: None,
                }),
            ),
            AccountKind::Checking | AccountKind::Savings => {
                let routing_number = required(&request.routing_number);
                let ach_kind = kind
                    .ach_kind()
                    .ok_or_else(|| GiveError::Internal("ACH kind missing".to_string()))?;
                (
                    PaymentDetail::Ach {
                        routing_number: routing_number.clone(),
                        account_number: account_number.clone(),
                        kind: ach_kind,
                    },
                    kind.as_str().to_string(),
                    Some(FreshInstrument {
                        display_name: kind.display_name().to_string(),
                        masked_number,
                        ach: Some((routing_number, account_number)),
                    }),
                )
            }
        }
    };

    Ok(PreparedPayment {
        info: PaymentInfo {
            amount: total,
            first_name: required(&request.first_name),
            last_name: required(&request.last_name),
            email: required(&request.email),
            phone_number: required(&request.phone_number),
            address: Some(billing_address(request)),
            detail,
        },
        currency_kind,
        fresh,
    })
}

// --- Donor resolution ---

async fn resolve_person(ctx: &GiveContext, request: &GiveRequest) -> Result<Person, GiveError> {
    if let Some(person_id) = request.person_id {
        return ctx
            .persons
            .find_by_id(person_id)
            .await?
            .ok_or(GiveError::UnknownPerson(person_id));
    }

    let first_name = required(&request.first_name);
    let last_name = required(&request.last_name);
    let email = required(&request.email);
    if let Some(existing) = ctx
        .persons
        .find_by_identity(&first_name, &last_name, &email)
        .await?
    {
        debug!(person_id = existing.id, "matched returning donor");
        return Ok(existing);
    }

    info!("creating first-time donor with a new family");
    let person = ctx
        .persons
        .create_with_family(NewPerson {
            first_name,
            last_name,
            email,
            phone_number: request.phone_number.clone().filter(|p| !p.trim().is_empty()),
            address: Some(HomeAddress {
                street1: required(&request.street1),
                street2: request.street2.clone().filter(|s| !s.trim().is_empty()),
                city: required(&request.city),
                state: required(&request.state),
                postal_code: required(&request.postal_code),
                country: request.country.clone().filter(|c| !c.trim().is_empty()),
            }),
        })
        .await?;
    Ok(person)
}

async fn resolve_saved_account(
    ctx: &GiveContext,
    request: &GiveRequest,
    person: &Person,
) -> Result<Option<SavedAccount>, GiveError> {
    let Some(source_account_id) = request.source_account_id else {
        return Ok(None);
    };
    match ctx.saved_accounts.find_by_id(source_account_id).await? {
        Some(account)
            if account.person_id == person.id && !account.reference_number.trim().is_empty() =>
        {
            Ok(Some(account))
        }
        // A missing account, someone else's account, or one that never got a
        // gateway reference are all unusable as a payment source.
        _ => Err(ValidationFailure::MissingAccountReference.into()),
    }
}

// --- Flow ---

/// Processes a gift end to end against the current date.
pub async fn process_give(ctx: &GiveContext, request: GiveRequest) -> Result<(), GiveError> {
    process_give_on(ctx, request, Utc::now().date_naive()).await
}

/// Same as [`process_give`] but with an explicit "today", so expiration
/// handling is deterministic under test.
pub async fn process_give_on(
    ctx: &GiveContext,
    request: GiveRequest,
    today: NaiveDate,
) -> Result<(), GiveError> {
    let giving = ctx.giving();
    let total = validate(&request, &giving, today)?;

    // Target funds are checked before anything is written so a bad fund id
    // leaves no partial donor records behind.
    for detail in &request.amount_details {
        if ctx.funds.find_by_id(detail.target_fund_id).await?.is_none() {
            return Err(ValidationFailure::UnknownTargetAccount {
                fund_id: detail.target_fund_id,
            }
            .into());
        }
    }

    // The donor is persisted before the charge is attempted. A declined or
    // failed charge still leaves the person and family on record.
    let person = resolve_person(ctx, &request).await?;
    let saved = resolve_saved_account(ctx, &request, &person).await?;
    let prepared = prepare_payment(&request, saved.as_ref(), total)?;

    debug!(person_id = person.id, amount = total, "submitting charge");
    let outcome = match ctx.gateway.charge(prepared.info).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(person_id = person.id, error = %err, "gateway charge failed");
            return Err(err.into());
        }
    };
    info!(
        person_id = person.id,
        transaction_code = %outcome.transaction_code,
        "charge settled"
    );

    let contribution = ctx
        .contributions
        .record(NewContribution {
            person_id: person.id,
            transaction_code: outcome.transaction_code.clone(),
            currency_kind: prepared.currency_kind.clone(),
            total_amount: total,
            details: request
                .amount_details
                .iter()
                .map(|d| NewContributionDetail {
                    fund_id: d.target_fund_id,
                    amount: d.amount,
                })
                .collect(),
        })
        .await?;
    debug!(contribution_id = contribution.id, "contribution recorded");

    if let Some(fresh) = prepared.fresh {
        save_payment_method(ctx, &person, &fresh, &outcome, &prepared.currency_kind).await?;
    }
    Ok(())
}

/// Tokenizes a fresh instrument and persists it for reuse. Failure to obtain
/// a token is logged and swallowed: the gift already settled and must not be
/// reported as failed over a bookkeeping hiccup.
async fn save_payment_method(
    ctx: &GiveContext,
    person: &Person,
    fresh: &FreshInstrument,
    outcome: &ChargeOutcome,
    currency_kind: &str,
) -> Result<(), GiveError> {
    let reference_number = match ctx.gateway.reference_number(&outcome.transaction_code).await {
        Ok(reference) if !reference.trim().is_empty() => reference,
        Ok(_) => {
            warn!(
                person_id = person.id,
                "gateway returned a blank payment reference, not saving the account"
            );
            return Ok(());
        }
        Err(err) => {
            warn!(
                person_id = person.id,
                error = %err,
                "payment reference retrieval failed, not saving the account"
            );
            return Ok(());
        }
    };

    let existing = ctx
        .saved_accounts
        .find_by_person_and_mask(person.id, &fresh.masked_number)
        .await?;
    if existing.is_none() {
        ctx.saved_accounts
            .create(NewSavedAccount {
                person_id: person.id,
                name: fresh.display_name.clone(),
                masked_number: fresh.masked_number.clone(),
                reference_number,
                transaction_code: outcome.transaction_code.clone(),
                currency_kind: currency_kind.to_string(),
            })
            .await?;
        debug!(person_id = person.id, "saved account stored for reuse");
    }

    if let Some((routing_number, account_number)) = &fresh.ach {
        let account_hash = hash_account(routing_number, account_number);
        let existing_hash = ctx
            .bank_accounts
            .find_by_person_and_hash(person.id, &account_hash)
            .await?;
        if existing_hash.is_none() {
            ctx.bank_accounts
                .create(NewBankAccount {
                    person_id: person.id,
                    masked_number: fresh.masked_number.clone(),
                    account_hash,
                })
                .await?;
            debug!(person_id = person.id, "bank account fingerprint stored");
        }
    }
    Ok(())
}
