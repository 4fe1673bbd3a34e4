// --- File: crates/givepoint_give/src/lib.rs ---
//! Donation processing for Givepoint: request validation, donor and family
//! bookkeeping, the gateway charge, and saved payment methods.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod models;
pub mod routes;

pub use error::{GiveError, ValidationFailure, GATEWAY_FALLBACK_MESSAGE};
pub use logic::{process_give, GiveContext};
pub use models::{AccountKind, AmountDetail, GiveRequest};
