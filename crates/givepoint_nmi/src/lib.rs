// --- File: crates/givepoint_nmi/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;

#[cfg(test)]
mod logic_test;

// Re-export for main backend
pub use error::NmiError;
pub use service::NmiPaymentGateway;
