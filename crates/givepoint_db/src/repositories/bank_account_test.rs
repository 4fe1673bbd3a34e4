// --- File: crates/givepoint_db/src/repositories/bank_account_test.rs ---

use crate::repositories::bank_account::hash_account;

#[test]
fn same_pair_hashes_to_same_value() {
    let a = hash_account("021000021", "123456789");
    let b = hash_account("021000021", "123456789");
    assert_eq!(a, b);
}

#[test]
fn different_accounts_hash_differently() {
    let a = hash_account("021000021", "123456789");
    let b = hash_account("021000021", "123456780");
    assert_ne!(a, b);
}

#[test]
fn routing_and_account_are_not_interchangeable() {
    // The separator keeps ("12", "345") distinct from ("123", "45").
    let a = hash_account("12", "345");
    let b = hash_account("123", "45");
    assert_ne!(a, b);
}

#[test]
fn hash_is_hex_sha256() {
    let hash = hash_account("021000021", "123456789");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}
