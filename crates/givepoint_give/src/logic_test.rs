// --- File: crates/givepoint_give/src/logic_test.rs ---
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use givepoint_common::services::{
    BoxFuture, ChargeOutcome, GatewayError, PaymentDetail, PaymentGateway, PaymentInfo,
};
use givepoint_common::HttpStatusCode;
use givepoint_config::{
    AppConfig, DatabaseConfig, GivingConfig, NmiConfig, ServerConfig,
};
use givepoint_db::{
    hash_account, BankAccount, BankAccountRepository, Contribution, ContributionDetail,
    ContributionRepository, DbError, Fund, FundRepository, NewBankAccount, NewContribution,
    NewPerson, NewSavedAccount, Person, PersonRepository, SavedAccount, SavedAccountRepository,
};

use crate::error::{GiveError, ValidationFailure, GATEWAY_FALLBACK_MESSAGE};
use crate::logic::{process_give_on, validate, GiveContext};
use crate::models::{AmountDetail, GiveRequest};

// --- Mock gateway ---

enum ReferenceBehavior {
    Ok(String),
    Blank,
    Fail,
}

struct MockGateway {
    charges: Mutex<Vec<PaymentInfo>>,
    charge_failure: Mutex<Option<GatewayError>>,
    reference: Mutex<ReferenceBehavior>,
    reference_calls: AtomicUsize,
}

impl Default for MockGateway {
    fn default() -> Self {
        MockGateway {
            charges: Mutex::new(Vec::new()),
            charge_failure: Mutex::new(None),
            reference: Mutex::new(ReferenceBehavior::Ok("vault-1".to_string())),
            reference_calls: AtomicUsize::new(0),
        }
    }
}

impl MockGateway {
    fn fail_next_charge(&self, error: GatewayError) {
        *self.charge_failure.lock().unwrap() = Some(error);
    }

    fn set_reference(&self, behavior: ReferenceBehavior) {
        *self.reference.lock().unwrap() = behavior;
    }

    fn charged_amounts(&self) -> Vec<i64> {
        self.charges.lock().unwrap().iter().map(|p| p.amount).collect()
    }
}

impl PaymentGateway for MockGateway {
    fn charge(&self, payment: PaymentInfo) -> BoxFuture<'_, ChargeOutcome, GatewayError> {
        self.charges.lock().unwrap().push(payment);
        let failure = self.charge_failure.lock().unwrap().take();
        Box::pin(async move {
            match failure {
                Some(error) => Err(error),
                None => Ok(ChargeOutcome {
                    transaction_code: "tx-100".to_string(),
                    authorization_code: Some("AUTH1".to_string()),
                }),
            }
        })
    }

    fn reference_number(&self, _transaction_code: &str) -> BoxFuture<'_, String, GatewayError> {
        self.reference_calls.fetch_add(1, Ordering::SeqCst);
        let result = match &*self.reference.lock().unwrap() {
            ReferenceBehavior::Ok(reference) => Ok(reference.clone()),
            ReferenceBehavior::Blank => Ok("   ".to_string()),
            ReferenceBehavior::Fail => Err(GatewayError::Api {
                message: "vault unavailable".to_string(),
            }),
        };
        Box::pin(async move { result })
    }
}

// --- In-memory store implementing all repositories ---

#[derive(Default)]
struct MemoryStore {
    persons: Mutex<Vec<Person>>,
    funds: Mutex<Vec<Fund>>,
    contributions: Mutex<Vec<Contribution>>,
    details: Mutex<Vec<ContributionDetail>>,
    saved_accounts: Mutex<Vec<SavedAccount>>,
    bank_accounts: Mutex<Vec<BankAccount>>,
}

impl MemoryStore {
    fn seed_fund(&self, id: i64, name: &str) {
        self.funds.lock().unwrap().push(Fund {
            id,
            name: name.to_string(),
            is_active: true,
        });
    }

    fn seed_person(&self, id: i64, first_name: &str, last_name: &str, email: &str) {
        self.persons.lock().unwrap().push(Person {
            id,
            family_id: id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone_number: None,
        });
    }

    fn seed_saved_account(&self, id: i64, person_id: i64, reference_number: &str) {
        self.saved_accounts.lock().unwrap().push(SavedAccount {
            id,
            person_id,
            name: "Visa".to_string(),
            masked_number: "************1111".to_string(),
            reference_number: reference_number.to_string(),
            transaction_code: "tx-old".to_string(),
            currency_kind: "credit".to_string(),
        });
    }
}

impl PersonRepository for MemoryStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Person>, DbError> {
        let found = self
            .persons
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> BoxFuture<'_, Option<Person>, DbError> {
        let found = self
            .persons
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.first_name == first_name && p.last_name == last_name && p.email == email)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn create_with_family(&self, person: NewPerson) -> BoxFuture<'_, Person, DbError> {
        let mut persons = self.persons.lock().unwrap();
        let id = persons.len() as i64 + 1;
        let created = Person {
            id,
            family_id: id,
            first_name: person.first_name,
            last_name: person.last_name,
            email: person.email,
            phone_number: person.phone_number,
        };
        persons.push(created.clone());
        Box::pin(async move { Ok(created) })
    }
}

impl FundRepository for MemoryStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<Fund>, DbError> {
        let found = self
            .funds
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id && f.is_active)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn create(&self, name: &str) -> BoxFuture<'_, Fund, DbError> {
        let mut funds = self.funds.lock().unwrap();
        let created = Fund {
            id: funds.len() as i64 + 1,
            name: name.to_string(),
            is_active: true,
        };
        funds.push(created.clone());
        Box::pin(async move { Ok(created) })
    }
}

impl ContributionRepository for MemoryStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn record(&self, contribution: NewContribution) -> BoxFuture<'_, Contribution, DbError> {
        let mut contributions = self.contributions.lock().unwrap();
        let mut details = self.details.lock().unwrap();
        let id = contributions.len() as i64 + 1;
        let created = Contribution {
            id,
            person_id: contribution.person_id,
            transaction_code: contribution.transaction_code,
            currency_kind: contribution.currency_kind,
            total_amount: contribution.total_amount,
        };
        contributions.push(created.clone());
        for detail in contribution.details {
            let detail_id = details.len() as i64 + 1;
            details.push(ContributionDetail {
                id: detail_id,
                contribution_id: id,
                fund_id: detail.fund_id,
                amount: detail.amount,
            });
        }
        Box::pin(async move { Ok(created) })
    }

    fn details_for(
        &self,
        contribution_id: i64,
    ) -> BoxFuture<'_, Vec<ContributionDetail>, DbError> {
        let found: Vec<ContributionDetail> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.contribution_id == contribution_id)
            .cloned()
            .collect();
        Box::pin(async move { Ok(found) })
    }
}

impl SavedAccountRepository for MemoryStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn find_by_id(&self, id: i64) -> BoxFuture<'_, Option<SavedAccount>, DbError> {
        let found = self
            .saved_accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn find_by_person_and_mask(
        &self,
        person_id: i64,
        masked_number: &str,
    ) -> BoxFuture<'_, Option<SavedAccount>, DbError> {
        let found = self
            .saved_accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.person_id == person_id && a.masked_number == masked_number)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn create(&self, account: NewSavedAccount) -> BoxFuture<'_, SavedAccount, DbError> {
        let mut accounts = self.saved_accounts.lock().unwrap();
        let created = SavedAccount {
            id: accounts.len() as i64 + 1,
            person_id: account.person_id,
            name: account.name,
            masked_number: account.masked_number,
            reference_number: account.reference_number,
            transaction_code: account.transaction_code,
            currency_kind: account.currency_kind,
        };
        accounts.push(created.clone());
        Box::pin(async move { Ok(created) })
    }
}

impl BankAccountRepository for MemoryStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn find_by_person_and_hash(
        &self,
        person_id: i64,
        account_hash: &str,
    ) -> BoxFuture<'_, Option<BankAccount>, DbError> {
        let found = self
            .bank_accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.person_id == person_id && a.account_hash == account_hash)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn create(&self, account: NewBankAccount) -> BoxFuture<'_, BankAccount, DbError> {
        let mut accounts = self.bank_accounts.lock().unwrap();
        let created = BankAccount {
            id: accounts.len() as i64 + 1,
            person_id: account.person_id,
            masked_number: account.masked_number,
            account_hash: account.account_hash,
        };
        accounts.push(created.clone());
        Box::pin(async move { Ok(created) })
    }
}

// --- Fixtures ---

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        use_nmi: true,
        use_give: true,
        database: Some(DatabaseConfig {
            url: "sqlite://:memory:".to_string(),
        }),
        nmi: Some(NmiConfig {
            api_url: "https://secure.example.test/api/transact.php".to_string(),
            currency: Some("USD".to_string()),
            timeout_secs: None,
        }),
        giving: Some(GivingConfig::default()),
    }
}

fn context(store: &Arc<MemoryStore>, gateway: &Arc<MockGateway>) -> GiveContext {
    GiveContext {
        config: Arc::new(test_config()),
        gateway: gateway.clone(),
        persons: store.clone(),
        funds: store.clone(),
        contributions: store.clone(),
        saved_accounts: store.clone(),
        bank_accounts: store.clone(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn giving() -> GivingConfig {
    GivingConfig::default()
}

fn base_request() -> GiveRequest {
    GiveRequest {
        first_name: Some("Ted".to_string()),
        last_name: Some("Decker".to_string()),
        email: Some("ted@example.com".to_string()),
        phone_number: Some("555-777-1234".to_string()),
        street1: Some("11624 N 31st Dr".to_string()),
        city: Some("Phoenix".to_string()),
        state: Some("AZ".to_string()),
        postal_code: Some("85029".to_string()),
        amount_details: vec![AmountDetail {
            target_fund_id: 1,
            amount: 2500,
        }],
        ..GiveRequest::default()
    }
}

fn credit_request() -> GiveRequest {
    GiveRequest {
        account_number: Some("4111111111111111".to_string()),
        account_type: Some("credit".to_string()),
        ccv: Some("123".to_string()),
        expiration_month: Some(12),
        expiration_year: Some(2027),
        ..base_request()
    }
}

fn ach_request() -> GiveRequest {
    GiveRequest {
        account_number: Some("1111111111".to_string()),
        routing_number: Some("110000000".to_string()),
        account_type: Some("checking".to_string()),
        ..base_request()
    }
}

// --- Validation order ---

#[test]
fn validation_checks_fail_in_declaration_order() {
    let cfg = giving();
    let mut request = GiveRequest::default();
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingPhone)
    );

    request.phone_number = Some("555-777-1234".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingEmail)
    );

    request.email = Some("ted@example.com".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingName)
    );

    request.first_name = Some("Ted".to_string());
    request.last_name = Some("Decker".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingAddress)
    );

    request.street1 = Some("11624 N 31st Dr".to_string());
    request.city = Some("Phoenix".to_string());
    request.state = Some("Arizona".to_string());
    request.postal_code = Some("85029".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidState)
    );

    request.state = Some("AZ".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingAccountReference)
    );

    request.account_number = Some("4111111111111111".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingAccountType)
    );
}

#[test]
fn credit_checks_require_ccv_and_expiration() {
    let cfg = giving();
    let mut request = credit_request();

    request.ccv = None;
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingCcv)
    );

    request.ccv = Some("123".to_string());
    request.expiration_month = Some(13);
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidExpirationMonth)
    );

    request.expiration_month = Some(12);
    request.expiration_year = Some(2024);
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidExpirationYear {
            min: 2025,
            max: 2055
        })
    );

    request.expiration_year = Some(2056);
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidExpirationYear {
            min: 2025,
            max: 2055
        })
    );
}

#[test]
fn card_expiring_earlier_this_year_is_rejected() {
    let cfg = giving();
    let mut request = credit_request();
    request.expiration_month = Some(5);
    request.expiration_year = Some(2025);
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::ExpiredCard)
    );

    // The expiration month itself is still valid.
    request.expiration_month = Some(6);
    assert!(validate(&request, &cfg, today()).is_ok());
}

#[test]
fn ach_requires_routing_number() {
    let cfg = giving();
    let mut request = ach_request();
    request.routing_number = Some("  ".to_string());
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingRoutingNumber)
    );
}

#[test]
fn saved_account_skips_instrument_checks() {
    let cfg = giving();
    let mut request = base_request();
    request.source_account_id = Some(7);
    request.person_id = Some(3);
    request.amount_details.clear();
    // No account fields at all, yet the next failure is about line items.
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingLineItems)
    );

    request.person_id = None;
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::MissingAccountReference)
    );
}

#[test]
fn line_items_below_the_minimum_are_rejected() {
    let cfg = giving();
    let mut request = credit_request();
    request.amount_details = vec![
        AmountDetail {
            target_fund_id: 1,
            amount: 2500,
        },
        AmountDetail {
            target_fund_id: 2,
            amount: 50,
        },
    ];
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidLineItemAmount { minimum: 100 })
    );
}

#[test]
fn overflowing_gift_total_is_rejected() {
    let cfg = giving();
    let mut request = credit_request();
    request.amount_details = vec![
        AmountDetail {
            target_fund_id: 1,
            amount: i64::MAX - 10,
        },
        AmountDetail {
            target_fund_id: 2,
            amount: i64::MAX - 10,
        },
    ];
    assert_eq!(
        validate(&request, &cfg, today()),
        Err(ValidationFailure::InvalidLineItemAmount { minimum: 100 })
    );
}

#[test]
fn validate_returns_the_gift_total() {
    let cfg = giving();
    let mut request = credit_request();
    request.amount_details = vec![
        AmountDetail {
            target_fund_id: 1,
            amount: 2500,
        },
        AmountDetail {
            target_fund_id: 2,
            amount: 1500,
        },
    ];
    assert_eq!(validate(&request, &cfg, today()), Ok(4000));
}

// --- Flow ---

#[tokio::test]
async fn credit_gift_charges_records_and_saves_the_card() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    let result = process_give_on(&ctx, credit_request(), today()).await;
    assert!(result.is_ok());

    assert_eq!(gateway.charged_amounts(), vec![2500]);

    let (contribution_id, total_amount) = {
        let contributions = store.contributions.lock().unwrap();
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].total_amount, 2500);
        assert_eq!(contributions[0].currency_kind, "credit");
        assert_eq!(contributions[0].transaction_code, "tx-100");
        (contributions[0].id, contributions[0].total_amount)
    };

    let details = store.details_for(contribution_id).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].fund_id, 1);
    let detail_sum: i64 = details.iter().map(|d| d.amount).sum();
    assert_eq!(detail_sum, total_amount);

    let saved = store.saved_accounts.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Visa");
    assert_eq!(saved[0].masked_number, "************1111");
    assert_eq!(saved[0].reference_number, "vault-1");
    assert_eq!(saved[0].currency_kind, "credit");

    assert!(store.bank_accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ach_gift_stores_the_bank_account_fingerprint() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    process_give_on(&ctx, ach_request(), today()).await.unwrap();

    let saved = store.saved_accounts.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Checking");
    assert_eq!(saved[0].currency_kind, "checking");

    let banks = store.bank_accounts.lock().unwrap();
    assert_eq!(banks.len(), 1);
    assert_eq!(banks[0].account_hash, hash_account("110000000", "1111111111"));
    assert_eq!(banks[0].masked_number, "******1111");
}

#[tokio::test]
async fn repeated_gifts_do_not_duplicate_saved_instruments() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    process_give_on(&ctx, ach_request(), today()).await.unwrap();
    process_give_on(&ctx, ach_request(), today()).await.unwrap();

    // Same donor resolved both times, both instruments deduplicated.
    assert_eq!(store.persons.lock().unwrap().len(), 1);
    assert_eq!(store.contributions.lock().unwrap().len(), 2);
    assert_eq!(store.saved_accounts.lock().unwrap().len(), 1);
    assert_eq!(store.bank_accounts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn second_donor_sharing_a_bank_account_gets_their_own_record() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    process_give_on(&ctx, ach_request(), today()).await.unwrap();

    // Same checking account, different donor.
    let mut spouse = ach_request();
    spouse.first_name = Some("Cindy".to_string());
    spouse.email = Some("cindy@example.com".to_string());
    process_give_on(&ctx, spouse, today()).await.unwrap();

    assert_eq!(store.persons.lock().unwrap().len(), 2);
    let banks = store.bank_accounts.lock().unwrap();
    assert_eq!(banks.len(), 2);
    assert_eq!(banks[0].account_hash, banks[1].account_hash);
    assert_ne!(banks[0].person_id, banks[1].person_id);
}

#[tokio::test]
async fn declined_charge_still_persists_the_new_donor() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    gateway.fail_next_charge(GatewayError::Declined {
        message: "DECLINE".to_string(),
    });
    let ctx = context(&store, &gateway);

    let err = process_give_on(&ctx, credit_request(), today())
        .await
        .unwrap_err();
    match err {
        GiveError::Gateway { message } => assert_eq!(message, "DECLINE"),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(store.persons.lock().unwrap().len(), 1);
    assert!(store.contributions.lock().unwrap().is_empty());
    assert!(store.saved_accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_gateway_message_falls_back_to_the_stock_one() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    gateway.fail_next_charge(GatewayError::Api {
        message: "  ".to_string(),
    });
    let ctx = context(&store, &gateway);

    let err = process_give_on(&ctx, credit_request(), today())
        .await
        .unwrap_err();
    match err {
        GiveError::Gateway { message } => assert_eq!(message, GATEWAY_FALLBACK_MESSAGE),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_timeout_maps_to_504() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    gateway.fail_next_charge(GatewayError::Timeout("deadline elapsed".to_string()));
    let ctx = context(&store, &gateway);

    let err = process_give_on(&ctx, credit_request(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, GiveError::Timeout(_)));
    assert_eq!(err.status_code(), 504);
}

#[tokio::test]
async fn reference_failure_does_not_fail_the_gift() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    gateway.set_reference(ReferenceBehavior::Fail);
    let ctx = context(&store, &gateway);

    process_give_on(&ctx, credit_request(), today()).await.unwrap();

    assert_eq!(store.contributions.lock().unwrap().len(), 1);
    assert!(store.saved_accounts.lock().unwrap().is_empty());
    assert!(store.bank_accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_reference_skips_the_saved_account() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    gateway.set_reference(ReferenceBehavior::Blank);
    let ctx = context(&store, &gateway);

    process_give_on(&ctx, ach_request(), today()).await.unwrap();

    assert_eq!(store.contributions.lock().unwrap().len(), 1);
    assert!(store.saved_accounts.lock().unwrap().is_empty());
    assert!(store.bank_accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_person_id_is_rejected_before_charging() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    let mut request = credit_request();
    request.person_id = Some(42);
    let err = process_give_on(&ctx, request, today()).await.unwrap_err();
    assert!(matches!(err, GiveError::UnknownPerson(42)));
    assert_eq!(err.status_code(), 400);
    assert!(gateway.charged_amounts().is_empty());
}

#[tokio::test]
async fn unknown_fund_leaves_no_records_behind() {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    let err = process_give_on(&ctx, credit_request(), today())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GiveError::Validation(ValidationFailure::UnknownTargetAccount { fund_id: 1 })
    ));
    assert!(store.persons.lock().unwrap().is_empty());
    assert!(gateway.charged_amounts().is_empty());
}

#[tokio::test]
async fn saved_account_of_another_donor_is_rejected() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    store.seed_person(1, "Ted", "Decker", "ted@example.com");
    store.seed_person(2, "Cindy", "Decker", "cindy@example.com");
    store.seed_saved_account(9, 2, "vault-other");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    let mut request = base_request();
    request.person_id = Some(1);
    request.source_account_id = Some(9);
    let err = process_give_on(&ctx, request, today()).await.unwrap_err();
    assert!(matches!(
        err,
        GiveError::Validation(ValidationFailure::MissingAccountReference)
    ));
    assert!(gateway.charged_amounts().is_empty());
}

#[tokio::test]
async fn saved_account_gift_charges_by_reference_without_retokenizing() {
    let store = Arc::new(MemoryStore::default());
    store.seed_fund(1, "General Fund");
    store.seed_person(1, "Ted", "Decker", "ted@example.com");
    store.seed_saved_account(9, 1, "vault-77");
    let gateway = Arc::new(MockGateway::default());
    let ctx = context(&store, &gateway);

    let mut request = base_request();
    request.person_id = Some(1);
    request.source_account_id = Some(9);
    process_give_on(&ctx, request, today()).await.unwrap();

    let charges = gateway.charges.lock().unwrap();
    assert_eq!(charges.len(), 1);
    match &charges[0].detail {
        PaymentDetail::Reference {
            reference_number, ..
        } => assert_eq!(reference_number, "vault-77"),
        other => panic!("unexpected payment detail: {other:?}"),
    }
    drop(charges);

    // No tokenization call and no second saved account.
    assert_eq!(gateway.reference_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.saved_accounts.lock().unwrap().len(), 1);

    let contributions = store.contributions.lock().unwrap();
    assert_eq!(contributions[0].currency_kind, "credit");
}
